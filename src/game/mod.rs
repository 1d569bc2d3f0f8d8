pub mod action;
pub mod bank;
pub mod game;
pub mod history;
pub mod players;
pub mod state;

pub use action::{ActionPayload, TurnAction};
pub use bank::{DeckError, Question, QuestionBank};
pub use game::Game;
pub use history::{HistoryConfig, HistoryTracker};
pub use players::{PlayerState, PowerUp};
pub use state::{
    GameError, GameEvent, GamePhase, GameState, MoveCause, PendingQuestion, QuestionSource,
    StepOutcome,
};
