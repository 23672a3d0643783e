//! Idempotent player registration: look the identity up, otherwise create the
//! player and its default wallets in one transaction.

mod workflow;

pub use workflow::{register, Registration, RegistrationError};
