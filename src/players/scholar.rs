use rand::Rng;
use rand::seq::SliceRandom;

use crate::game::action::{ActionPayload, TurnAction};
use crate::game::game::Game;
use crate::players::BasePlayer;
use crate::types::ActionType;

const DEFAULT_ACCURACY: f64 = 0.75;

/// Knows the answer key and gets it right with probability `accuracy`.
#[derive(Debug, Clone)]
pub struct ScholarPlayer {
    pub accuracy: f64,
}

impl ScholarPlayer {
    pub fn new(accuracy: Option<f64>) -> Self {
        Self {
            accuracy: accuracy.unwrap_or(DEFAULT_ACCURACY).clamp(0.0, 1.0),
        }
    }
}

impl Default for ScholarPlayer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl BasePlayer for ScholarPlayer {
    fn decide(&self, game: &Game, actions: &[TurnAction]) -> Option<TurnAction> {
        let mut rng = rand::thread_rng();
        let question = match game.state.pending_question() {
            Some(question) => question,
            None => return actions.choose(&mut rng).cloned(),
        };

        let knows_it = rng.gen_bool(self.accuracy);
        let (right, wrong): (Vec<&TurnAction>, Vec<&TurnAction>) = actions
            .iter()
            .filter(|action| action.action_type == ActionType::Answer)
            .partition(|action| action.payload == ActionPayload::Choice(question.correct));

        let pool = if knows_it || wrong.is_empty() {
            right
        } else {
            wrong
        };
        pool.choose(&mut rng).map(|action| (*action).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn perfect_scholar_always_answers_correctly() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.execute(TurnAction::roll_value(0, 2)).unwrap();
        let correct = game.state.pending_question().unwrap().correct;
        let scholar = ScholarPlayer::new(Some(1.0));
        for _ in 0..20 {
            let action = scholar
                .decide(&game, &game.state.legal_actions())
                .unwrap();
            assert_eq!(action, TurnAction::answer(0, correct));
        }
    }

    #[test]
    fn hopeless_scholar_never_does() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.execute(TurnAction::roll_value(0, 2)).unwrap();
        let correct = game.state.pending_question().unwrap().correct;
        let scholar = ScholarPlayer::new(Some(0.0));
        for _ in 0..20 {
            let action = scholar
                .decide(&game, &game.state.legal_actions())
                .unwrap();
            assert_ne!(action, TurnAction::answer(0, correct));
        }
    }

    #[test]
    fn rolls_when_no_question_is_pending() {
        let game = Game::new(GameConfig::default()).unwrap();
        let action = ScholarPlayer::default()
            .decide(&game, &game.state.legal_actions())
            .unwrap();
        assert_eq!(action, TurnAction::roll(0));
    }
}
