#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod config;
pub mod game;
pub mod players;
pub mod types;

pub use board::{Board, BoardError};
pub use config::{ConfigError, GameConfig};
pub use game::{Game, GameEvent, GamePhase, GameState, StepOutcome, TurnAction};
pub use types::{ActionPrompt, ActionType, Category, TileKind};
