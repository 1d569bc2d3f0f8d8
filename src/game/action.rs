use serde::{Deserialize, Serialize};

use crate::types::{ActionType, Category};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TurnAction {
    pub player_index: usize,
    pub action_type: ActionType,
    pub payload: ActionPayload,
}

impl TurnAction {
    pub fn new(player_index: usize, action_type: ActionType) -> Self {
        Self {
            player_index,
            action_type,
            payload: ActionPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: ActionPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Roll trigger; the die is thrown by the game's own RNG.
    pub fn roll(player_index: usize) -> Self {
        Self::new(player_index, ActionType::Roll)
    }

    /// Roll with a die value already thrown by the caller.
    pub fn roll_value(player_index: usize, value: u8) -> Self {
        Self::new(player_index, ActionType::Roll).with_payload(ActionPayload::Die(value))
    }

    pub fn choose_category(player_index: usize, category: Category) -> Self {
        Self::new(player_index, ActionType::ChooseCategory)
            .with_payload(ActionPayload::Category(category))
    }

    pub fn answer(player_index: usize, option: usize) -> Self {
        Self::new(player_index, ActionType::Answer).with_payload(ActionPayload::Choice(option))
    }

    /// Answer prompt dismissed without a choice; scored as a wrong answer.
    pub fn skip_answer(player_index: usize) -> Self {
        Self::new(player_index, ActionType::Answer)
    }

    pub fn quit(player_index: usize) -> Self {
        Self::new(player_index, ActionType::Quit)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ActionPayload {
    #[default]
    None,
    Die(u8),
    Category(Category),
    Choice(usize),
}
