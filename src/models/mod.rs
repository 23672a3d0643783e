pub mod player;
pub mod wallet;

pub use player::{NewPlayer, Player};
pub use wallet::Wallet;
