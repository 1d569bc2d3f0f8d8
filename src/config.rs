//! Game configuration.
//!
//! Everything has a default, so an empty TOML file is a valid two-player
//! game on the standard board with the built-in question deck.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, BoardError};
use crate::game::bank::{DeckError, QuestionBank};
use crate::game::history::HistoryConfig;
use crate::game::players::{MAX_PLAYERS, MIN_PLAYERS, default_name};
use crate::types::{Category, TileKind};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid board layout: {0}")]
    Board(#[from] BoardError),
    #[error("invalid question bank: {0}")]
    Deck(#[from] DeckError),
    #[error("between 2 and 4 players required, got {0}")]
    InvalidPlayerCount(usize),
    #[error("{names} player names given for {players} players")]
    TooManyNames { names: usize, players: usize },
    #[error("history refill_threshold must be at least 1")]
    ZeroRefillThreshold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub num_players: usize,
    /// Seat names in seat order; missing seats fall back to "Player N".
    pub player_names: Vec<String>,
    pub seed: u64,
    pub history: HistoryConfig,
    /// Custom track, written with the tile labels (`START`, `Food`, `Black_Hole`, ...).
    pub board: Option<Vec<TileKind>>,
    /// JSON question bank replacing the built-in deck.
    pub question_bank: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 2,
            player_names: Vec::new(),
            seed: 42,
            history: HistoryConfig::default(),
            board: None,
            question_bank: None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(ConfigError::InvalidPlayerCount(self.num_players));
        }
        if self.player_names.len() > self.num_players {
            return Err(ConfigError::TooManyNames {
                names: self.player_names.len(),
                players: self.num_players,
            });
        }
        if self.history.refill_threshold == 0 {
            return Err(ConfigError::ZeroRefillThreshold);
        }
        Ok(())
    }

    pub fn player_name(&self, seat: u8) -> String {
        self.player_names
            .get(usize::from(seat).saturating_sub(1))
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| default_name(seat))
    }

    pub fn build_board(&self) -> Result<Board, BoardError> {
        match &self.board {
            Some(layout) => Board::from_layout(layout),
            None => Ok(Board::standard()),
        }
    }

    /// Loads the configured bank; every category must be able to serve a question.
    pub fn load_bank(&self) -> Result<QuestionBank, DeckError> {
        let bank = match &self.question_bank {
            Some(path) => QuestionBank::from_json_path(path)?,
            None => QuestionBank::standard(),
        };
        if let Some(empty) = Category::ALL.into_iter().find(|c| bank.len(*c) == 0) {
            return Err(DeckError::EmptyCategory(empty));
        }
        Ok(bank)
    }
}
