use crate::game::action::TurnAction;
use crate::game::game::Game;
use crate::players::BasePlayer;
use rand::seq::SliceRandom;

#[derive(Clone)]
pub struct RandomPlayer;

impl BasePlayer for RandomPlayer {
    fn decide(&self, _game: &Game, actions: &[TurnAction]) -> Option<TurnAction> {
        let mut rng = rand::thread_rng();
        actions.choose(&mut rng).cloned()
    }
}
