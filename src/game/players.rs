use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Collected power-up. Stored on the player but has no effect on movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub name: String,
    pub effect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    /// 1-based seat number shown on the board.
    pub seat: u8,
    pub position: usize,
    pub correct_answers: u32,
    pub power_ups: Vec<PowerUp>,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, seat: u8) -> Self {
        Self {
            name: name.into(),
            seat,
            position: 0,
            correct_answers: 0,
            power_ups: Vec::new(),
        }
    }

    pub fn record_correct_answer(&mut self) {
        self.correct_answers += 1;
    }
}

/// Default display names for seats without a configured name.
pub fn default_name(seat: u8) -> String {
    format!("Player {seat}")
}
