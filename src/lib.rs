//! Turn-based terminal maze: reach the exit, dodge wandering enemies, pick
//! up bonus items, across five levels with save slots.

pub mod collectible;
pub mod config;
pub mod enemy;
pub mod entity;
pub mod error;
pub mod game;
pub mod maze;
pub mod player;
pub mod render;
pub mod save;
pub mod shell;
pub mod terminal;

pub use error::SaveError;
pub use game::{Command, Game, GameState, MAX_LEVELS};
