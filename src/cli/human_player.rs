use tracing::error;

use crate::cli::tui::TuiApp;
use crate::game::action::TurnAction;
use crate::game::game::Game;
use crate::players::BasePlayer;

#[derive(Debug, Clone)]
pub struct HumanPlayer {
    pub seat: usize,
}

impl HumanPlayer {
    pub fn new(seat: usize) -> Self {
        Self { seat }
    }
}

impl BasePlayer for HumanPlayer {
    fn decide(&self, game: &Game, actions: &[TurnAction]) -> Option<TurnAction> {
        if actions.is_empty() {
            return None;
        }

        let mut app = TuiApp::new(game, self.seat, actions.to_vec());
        match app.run() {
            Ok(action) => action,
            Err(err) => {
                error!(%err, "terminal UI failed");
                None
            }
        }
    }
}
