//! Rules engine for tCHu, a two or three player train game on a North American map.

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate smallvec;

pub mod bag;
pub mod bot;
pub mod card;
pub mod card_state;
pub mod channel_player;
pub mod config;
pub mod deck;
pub mod error;
pub mod game;
pub mod game_phase;
pub mod game_state;
pub mod info;
pub mod map;
pub mod player;
pub mod player_state;
pub mod route;
pub mod station;
pub mod station_partition;
pub mod ticket;
pub mod trail;

pub use error::{GameError, GameResult};
