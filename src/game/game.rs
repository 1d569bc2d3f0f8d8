use tracing::warn;
use uuid::Uuid;

use crate::config::{ConfigError, GameConfig};
use crate::game::action::TurnAction;
use crate::game::state::{GameError, GameEvent, GameState, StepOutcome};
use crate::players::BasePlayer;

pub const TURNS_LIMIT: u32 = 1000;

pub struct Game {
    pub seed: u64,
    pub id: Uuid,
    pub state: GameState,
    /// Every event emitted so far, in order.
    pub events: Vec<GameEvent>,
}

impl Game {
    /// Builds the board and question bank the config points at.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = config.build_board()?;
        let bank = config.load_bank()?;
        Ok(Self::from_state(GameState::new(config, board, bank)))
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            seed: state.config.seed,
            id: Uuid::new_v4(),
            state,
            events: Vec::new(),
        }
    }

    /// Runs until someone reaches END, a decider quits, or the turn limit is hit.
    pub fn play<P: BasePlayer>(&mut self, players: &[P]) -> Option<usize> {
        while !self.state.is_finished() && self.state.turn < TURNS_LIMIT {
            if self.play_tick(players).is_none() {
                break;
            }
        }
        self.state.winner()
    }

    /// Asks the acting decider for one input and applies it.
    pub fn play_tick<P: BasePlayer>(&mut self, players: &[P]) -> Option<StepOutcome> {
        let current_idx = self.state.current_player;
        let player = players.get(current_idx)?;

        let legal_actions = self.state.legal_actions();
        if legal_actions.is_empty() {
            return None;
        }

        let action = player
            .decide(self, &legal_actions)
            .unwrap_or_else(|| TurnAction::quit(current_idx));
        match self.execute(action) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!(player = current_idx, %err, "decider produced a rejected action");
                None
            }
        }
    }

    pub fn execute(&mut self, action: TurnAction) -> Result<StepOutcome, GameError> {
        let outcome = self.state.step(action)?;
        self.events.extend(outcome.events.iter().cloned());
        Ok(outcome)
    }

    pub fn winner(&self) -> Option<usize> {
        self.state.winner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GamePhase;
    use crate::players::RandomPlayer;
    use crate::types::ActionType;

    struct Quitter;

    impl BasePlayer for Quitter {
        fn decide(&self, _game: &Game, _actions: &[TurnAction]) -> Option<TurnAction> {
            None
        }
    }

    #[test]
    fn execute_keeps_event_log() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let outcome = game.execute(TurnAction::roll_value(0, 4)).unwrap();
        assert_eq!(game.events, outcome.events);
        game.execute(TurnAction::roll_value(1, 4)).unwrap();
        assert_eq!(game.events.len(), outcome.events.len() * 2);
    }

    #[test]
    fn rejected_action_leaves_log_untouched() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert!(game.execute(TurnAction::answer(0, 0)).is_err());
        assert!(game.events.is_empty());
    }

    #[test]
    fn declining_decider_abandons_game() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(game.play(&[Quitter, Quitter]), None);
        assert_eq!(game.state.phase, GamePhase::Abandoned);
        assert_eq!(
            game.state.actions.last().map(|a| a.action_type),
            Some(ActionType::Quit)
        );
    }

    #[test]
    fn random_players_finish_a_game() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let players = [RandomPlayer, RandomPlayer];
        let winner = game.play(&players);
        if game.state.turn < TURNS_LIMIT {
            let winner = winner.unwrap();
            assert_eq!(
                game.state.players[winner].position,
                game.state.board.end_index()
            );
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GameConfig {
            num_players: 6,
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::new(config),
            Err(ConfigError::InvalidPlayerCount(6))
        ));
    }
}
