use crate::game::{action::TurnAction, game::Game};

/// Supplies the inputs a turn waits on: roll trigger, prayer category, answer.
/// Returning `None` quits the game.
pub trait BasePlayer {
    fn decide(&self, game: &Game, actions: &[TurnAction]) -> Option<TurnAction>;
}
