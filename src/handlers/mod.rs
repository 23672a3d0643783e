mod error;
mod player;

pub use player::{register_player, test_registration};
