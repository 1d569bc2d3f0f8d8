use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::config::GameConfig;
use crate::types::{ActionPrompt, ActionType, Category, TileKind};

use super::{
    action::{ActionPayload, TurnAction},
    bank::{DeckError, Question, QuestionBank},
    history::HistoryTracker,
    players::{MAX_PLAYERS, MIN_PLAYERS, PlayerState},
};

pub const DIE_SIDES: u8 = 6;
/// Retreat range after a wrong answer on a category tile.
pub const PENALTY_RANGE: std::ops::RangeInclusive<usize> = 1..=3;
/// Extra steps after a correct answer on a star tile.
pub const STAR_BONUS_RANGE: std::ops::RangeInclusive<usize> = 1..=3;
pub const PRAYER_BONUS: usize = 2;
pub const PRAYER_PENALTY: usize = 1;

/// What put a question in front of the player; decides the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionSource {
    Tile,
    Star,
    Prayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub category: Category,
    pub index: usize,
    pub source: QuestionSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    AwaitingRoll,
    /// Prayer tile: the player picks the deck.
    AwaitingCategory,
    AwaitingAnswer(PendingQuestion),
    Completed { winner: usize },
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCause {
    Roll,
    WrongAnswer,
    BlackHole,
    StarBonus,
    PrayerBonus,
    PrayerPenalty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    DiceRolled {
        player: usize,
        value: u8,
    },
    Moved {
        player: usize,
        from: usize,
        to: usize,
        cause: MoveCause,
    },
    LandedOn {
        player: usize,
        tile: TileKind,
    },
    QuestionAsked {
        player: usize,
        category: Category,
        index: usize,
        source: QuestionSource,
    },
    Answered {
        player: usize,
        choice: Option<usize>,
        correct: bool,
    },
    TurnAdvanced {
        next_player: usize,
    },
    GameWon {
        winner: usize,
        correct_answers: u32,
    },
    GameAbandoned {
        player: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub events: Vec<GameEvent>,
    pub done: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("game already completed")]
    GameFinished,
    #[error("invalid player index {0}")]
    InvalidPlayer(usize),
    #[error("action by player {actual} but expected {expected}")]
    ActionOutOfTurn { expected: usize, actual: usize },
    #[error("action {action} not allowed while waiting for {prompt}")]
    IllegalAction {
        prompt: ActionPrompt,
        action: ActionType,
    },
    #[error("missing or invalid payload: {0}")]
    InvalidPayload(&'static str),
    #[error("die value {0} outside 1..=6")]
    InvalidRoll(u8),
    #[error("option {choice} out of range for a question with {options} options")]
    InvalidAnswer { choice: usize, options: usize },
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// One game session: the board, the decks, the players, and the turn machine.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub board: Board,
    pub bank: QuestionBank,
    pub history: HistoryTracker,
    pub players: Vec<PlayerState>,
    pub phase: GamePhase,
    pub current_player: usize,
    pub turn: u32,
    pub last_roll: Option<u8>,
    pub actions: Vec<TurnAction>,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig, board: Board, bank: QuestionBank) -> Self {
        assert!(
            (MIN_PLAYERS..=MAX_PLAYERS).contains(&config.num_players),
            "the game supports between 2 and 4 players"
        );
        assert!(
            Category::ALL.iter().all(|category| bank.len(*category) > 0),
            "every category needs at least one question"
        );

        let players = (1..=config.num_players as u8)
            .map(|seat| PlayerState::new(config.player_name(seat), seat))
            .collect();

        Self {
            rng: StdRng::seed_from_u64(config.seed),
            history: HistoryTracker::new(config.history),
            config,
            board,
            bank,
            players,
            phase: GamePhase::AwaitingRoll,
            current_player: 0,
            turn: 0,
            last_roll: None,
            actions: Vec::new(),
        }
    }

    /// Standard board and built-in deck.
    pub fn standard(config: GameConfig) -> Self {
        Self::new(config, Board::standard(), QuestionBank::standard())
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::Completed { .. } | GamePhase::Abandoned
        )
    }

    pub fn winner(&self) -> Option<usize> {
        match self.phase {
            GamePhase::Completed { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn current(&self) -> &PlayerState {
        &self.players[self.current_player]
    }

    pub fn prompt(&self) -> Option<ActionPrompt> {
        match self.phase {
            GamePhase::AwaitingRoll => Some(ActionPrompt::Roll),
            GamePhase::AwaitingCategory => Some(ActionPrompt::ChooseCategory),
            GamePhase::AwaitingAnswer(_) => Some(ActionPrompt::AnswerQuestion),
            GamePhase::Completed { .. } | GamePhase::Abandoned => None,
        }
    }

    pub fn pending(&self) -> Option<PendingQuestion> {
        match self.phase {
            GamePhase::AwaitingAnswer(pending) => Some(pending),
            _ => None,
        }
    }

    /// The question the acting player has to answer, if any.
    pub fn pending_question(&self) -> Option<&Question> {
        let pending = self.pending()?;
        self.bank.question(pending.category, pending.index)
    }

    /// Inputs accepted in the current phase. Quitting is always possible and not listed.
    pub fn legal_actions(&self) -> Vec<TurnAction> {
        let player = self.current_player;
        match self.phase {
            GamePhase::AwaitingRoll => vec![TurnAction::roll(player)],
            GamePhase::AwaitingCategory => self
                .bank
                .playable_categories()
                .map(|category| TurnAction::choose_category(player, category))
                .collect(),
            GamePhase::AwaitingAnswer(_) => {
                let options = self.pending_question().map_or(0, |q| q.options.len());
                (0..options)
                    .map(|option| TurnAction::answer(player, option))
                    .collect()
            }
            GamePhase::Completed { .. } | GamePhase::Abandoned => Vec::new(),
        }
    }

    pub fn step(&mut self, action: TurnAction) -> Result<StepOutcome, GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }
        if action.player_index >= self.players.len() {
            return Err(GameError::InvalidPlayer(action.player_index));
        }
        if action.player_index != self.current_player {
            return Err(GameError::ActionOutOfTurn {
                expected: self.current_player,
                actual: action.player_index,
            });
        }

        let mut outcome = StepOutcome::default();
        match (self.phase, action.action_type) {
            (_, ActionType::Quit) => {
                self.phase = GamePhase::Abandoned;
                info!(player = self.current_player, turn = self.turn, "game abandoned");
                self.emit(
                    &mut outcome,
                    GameEvent::GameAbandoned {
                        player: self.current_player,
                    },
                );
            }
            (GamePhase::AwaitingRoll, ActionType::Roll) => {
                let value = match action.payload {
                    ActionPayload::None => self.rng.gen_range(1..=DIE_SIDES),
                    ActionPayload::Die(value) if (1..=DIE_SIDES).contains(&value) => value,
                    ActionPayload::Die(value) => return Err(GameError::InvalidRoll(value)),
                    _ => return Err(GameError::InvalidPayload("expected die value")),
                };
                self.handle_roll(value, &mut outcome)?;
            }
            (GamePhase::AwaitingCategory, ActionType::ChooseCategory) => {
                let category = match action.payload {
                    ActionPayload::Category(category) => category,
                    _ => return Err(GameError::InvalidPayload("expected category")),
                };
                self.ask_from_history(category, QuestionSource::Prayer, &mut outcome)?;
            }
            (GamePhase::AwaitingAnswer(pending), ActionType::Answer) => {
                let choice = match action.payload {
                    ActionPayload::Choice(choice) => Some(choice),
                    ActionPayload::None => None,
                    _ => return Err(GameError::InvalidPayload("expected option index")),
                };
                let options = self
                    .bank
                    .question(pending.category, pending.index)
                    .map_or(0, |q| q.options.len());
                if let Some(choice) = choice.filter(|c| *c >= options) {
                    return Err(GameError::InvalidAnswer { choice, options });
                }
                self.handle_answer(pending, choice, &mut outcome);
            }
            (_, action_type) => {
                return Err(GameError::IllegalAction {
                    prompt: self.prompt().unwrap_or(ActionPrompt::Roll),
                    action: action_type,
                });
            }
        }

        self.actions.push(action);
        outcome.done = self.is_finished();
        Ok(outcome)
    }

    fn handle_roll(&mut self, value: u8, outcome: &mut StepOutcome) -> Result<(), GameError> {
        let player = self.current_player;
        self.last_roll = Some(value);
        self.emit(outcome, GameEvent::DiceRolled { player, value });

        let from = self.players[player].position;
        let target = self.board.resolve_move(from, usize::from(value));
        self.move_current(target, MoveCause::Roll, outcome);

        let tile = self
            .board
            .tile(target)
            .expect("resolved move stays on the board");
        self.emit(outcome, GameEvent::LandedOn { player, tile });

        match tile {
            TileKind::Start | TileKind::End => self.finish_turn(outcome),
            TileKind::Food | TileKind::Daily | TileKind::Special => {
                let category = tile.category().expect("deck tiles carry a category");
                self.ask_from_history(category, QuestionSource::Tile, outcome)?;
            }
            TileKind::BlackHole => {
                let destination = self.board.previous_black_hole(target);
                self.move_current(destination, MoveCause::BlackHole, outcome);
                self.finish_turn(outcome);
            }
            TileKind::Star => self.ask_star_question(outcome)?,
            TileKind::Prayer => self.phase = GamePhase::AwaitingCategory,
        }
        Ok(())
    }

    fn ask_from_history(
        &mut self,
        category: Category,
        source: QuestionSource,
        outcome: &mut StepOutcome,
    ) -> Result<(), GameError> {
        let index = self
            .history
            .next_question(category, &self.bank, &mut self.rng)?;
        self.pose(PendingQuestion {
            category,
            index,
            source,
        }, outcome);
        Ok(())
    }

    /// Star questions come from a random deck and skip the repeat history.
    fn ask_star_question(&mut self, outcome: &mut StepOutcome) -> Result<(), GameError> {
        let categories: Vec<Category> = self.bank.playable_categories().collect();
        let category = *categories
            .choose(&mut self.rng)
            .ok_or(DeckError::EmptyCategory(Category::Food))?;
        let index = self.rng.gen_range(0..self.bank.len(category));
        self.pose(
            PendingQuestion {
                category,
                index,
                source: QuestionSource::Star,
            },
            outcome,
        );
        Ok(())
    }

    fn pose(&mut self, pending: PendingQuestion, outcome: &mut StepOutcome) {
        self.phase = GamePhase::AwaitingAnswer(pending);
        self.emit(
            outcome,
            GameEvent::QuestionAsked {
                player: self.current_player,
                category: pending.category,
                index: pending.index,
                source: pending.source,
            },
        );
    }

    fn handle_answer(
        &mut self,
        pending: PendingQuestion,
        choice: Option<usize>,
        outcome: &mut StepOutcome,
    ) {
        let player = self.current_player;
        let correct = choice.is_some_and(|choice| {
            self.bank
                .question(pending.category, pending.index)
                .is_some_and(|q| q.is_correct(choice))
        });
        self.emit(
            outcome,
            GameEvent::Answered {
                player,
                choice,
                correct,
            },
        );

        let position = self.players[player].position;
        match (pending.source, correct) {
            (QuestionSource::Tile, true) => self.players[player].record_correct_answer(),
            (QuestionSource::Tile, false) => {
                let penalty = self.rng.gen_range(PENALTY_RANGE);
                self.move_current(
                    position.saturating_sub(penalty),
                    MoveCause::WrongAnswer,
                    outcome,
                );
            }
            (QuestionSource::Star, true) => {
                let bonus = self.rng.gen_range(STAR_BONUS_RANGE);
                let destination = self.board.resolve_move(position, bonus);
                self.move_current(destination, MoveCause::StarBonus, outcome);
            }
            (QuestionSource::Star, false) => {}
            (QuestionSource::Prayer, true) => {
                self.players[player].record_correct_answer();
                let destination = self.board.resolve_move(position, PRAYER_BONUS);
                self.move_current(destination, MoveCause::PrayerBonus, outcome);
            }
            (QuestionSource::Prayer, false) => {
                self.move_current(
                    position.saturating_sub(PRAYER_PENALTY),
                    MoveCause::PrayerPenalty,
                    outcome,
                );
            }
        }
        self.finish_turn(outcome);
    }

    fn move_current(&mut self, to: usize, cause: MoveCause, outcome: &mut StepOutcome) {
        let player = self.current_player;
        let from = self.players[player].position;
        let to = to.min(self.board.end_index());
        self.players[player].position = to;
        self.emit(
            outcome,
            GameEvent::Moved {
                player,
                from,
                to,
                cause,
            },
        );
    }

    fn finish_turn(&mut self, outcome: &mut StepOutcome) {
        let player = &self.players[self.current_player];
        if player.position == self.board.end_index() {
            let winner = self.current_player;
            let correct_answers = player.correct_answers;
            info!(
                winner = %player.name,
                correct_answers,
                turn = self.turn,
                "game won"
            );
            self.phase = GamePhase::Completed { winner };
            self.emit(
                outcome,
                GameEvent::GameWon {
                    winner,
                    correct_answers,
                },
            );
            return;
        }

        self.current_player = (self.current_player + 1) % self.players.len();
        self.turn += 1;
        self.phase = GamePhase::AwaitingRoll;
        self.emit(
            outcome,
            GameEvent::TurnAdvanced {
                next_player: self.current_player,
            },
        );
    }

    fn emit(&self, outcome: &mut StepOutcome, event: GameEvent) {
        debug!(turn = self.turn, ?event, "game event");
        outcome.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_player_game() -> GameState {
        GameState::standard(GameConfig::default())
    }

    #[test]
    fn starts_waiting_for_first_seat_to_roll() {
        let state = two_player_game();
        assert_eq!(state.phase, GamePhase::AwaitingRoll);
        assert_eq!(state.current_player, 0);
        assert_eq!(state.legal_actions(), vec![TurnAction::roll(0)]);
        assert_eq!(state.players[0].name, "Player 1");
        assert_eq!(state.players[1].seat, 2);
    }

    #[test]
    fn rejects_out_of_turn_actions_without_mutation() {
        let mut state = two_player_game();
        let err = state.step(TurnAction::roll_value(1, 3)).unwrap_err();
        assert!(matches!(
            err,
            GameError::ActionOutOfTurn {
                expected: 0,
                actual: 1
            }
        ));
        assert_eq!(state.players[0].position, 0);
        assert!(state.actions.is_empty());
    }

    #[test]
    fn rejects_bad_die_values() {
        let mut state = two_player_game();
        assert!(matches!(
            state.step(TurnAction::roll_value(0, 7)),
            Err(GameError::InvalidRoll(7))
        ));
        assert!(matches!(
            state.step(TurnAction::roll_value(0, 0)),
            Err(GameError::InvalidRoll(0))
        ));
        assert_eq!(state.last_roll, None);
    }

    #[test]
    fn answer_before_roll_is_illegal() {
        let mut state = two_player_game();
        let err = state.step(TurnAction::answer(0, 0)).unwrap_err();
        assert!(matches!(
            err,
            GameError::IllegalAction {
                prompt: ActionPrompt::Roll,
                action: ActionType::Answer
            }
        ));
    }

    #[test]
    fn black_hole_rewinds_to_start_when_first() {
        let mut state = two_player_game();
        // Tile 4 is the first black hole.
        let outcome = state.step(TurnAction::roll_value(0, 4)).unwrap();
        assert_eq!(state.players[0].position, 0);
        assert_eq!(state.current_player, 1);
        assert!(outcome.events.contains(&GameEvent::Moved {
            player: 0,
            from: 4,
            to: 0,
            cause: MoveCause::BlackHole
        }));
        assert_eq!(
            outcome.events.last(),
            Some(&GameEvent::TurnAdvanced { next_player: 1 })
        );
    }

    #[test]
    fn category_tile_asks_from_matching_deck() {
        let mut state = two_player_game();
        // Tile 2 is Food.
        state.step(TurnAction::roll_value(0, 2)).unwrap();
        let pending = state.pending().unwrap();
        assert_eq!(pending.category, Category::Food);
        assert_eq!(pending.source, QuestionSource::Tile);
        assert_eq!(state.history.recent(Category::Food), &[pending.index]);
        assert_eq!(state.legal_actions().len(), state.pending_question().unwrap().options.len());
    }

    #[test]
    fn correct_category_answer_keeps_position_and_scores() {
        let mut state = two_player_game();
        state.step(TurnAction::roll_value(0, 2)).unwrap();
        let correct = state.pending_question().unwrap().correct;
        state.step(TurnAction::answer(0, correct)).unwrap();
        assert_eq!(state.players[0].position, 2);
        assert_eq!(state.players[0].correct_answers, 1);
        assert_eq!(state.phase, GamePhase::AwaitingRoll);
        assert_eq!(state.current_player, 1);
    }

    #[test]
    fn wrong_category_answer_retreats_one_to_three() {
        let mut state = two_player_game();
        // Tile 6 is Daily.
        state.step(TurnAction::roll_value(0, 6)).unwrap();
        let question = state.pending_question().unwrap();
        let wrong = (question.correct + 1) % question.options.len();
        state.step(TurnAction::answer(0, wrong)).unwrap();
        let position = state.players[0].position;
        assert!((3..=5).contains(&position), "landed on {position}");
        assert_eq!(state.players[0].correct_answers, 0);
    }

    #[test]
    fn skipped_answer_counts_as_wrong() {
        let mut state = two_player_game();
        state.step(TurnAction::roll_value(0, 1)).unwrap();
        let outcome = state.step(TurnAction::skip_answer(0)).unwrap();
        assert!(outcome.events.contains(&GameEvent::Answered {
            player: 0,
            choice: None,
            correct: false
        }));
        assert_eq!(state.players[0].position, 0);
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let mut state = two_player_game();
        state.step(TurnAction::roll_value(0, 1)).unwrap();
        let options = state.pending_question().unwrap().options.len();
        assert!(matches!(
            state.step(TurnAction::answer(0, 9)),
            Err(GameError::InvalidAnswer { choice: 9, options: o }) if o == options
        ));
        assert!(state.pending().is_some());
    }

    #[test]
    fn star_question_bypasses_history() {
        let mut state = two_player_game();
        // Tile 5 is a star.
        state.step(TurnAction::roll_value(0, 5)).unwrap();
        let pending = state.pending().unwrap();
        assert_eq!(pending.source, QuestionSource::Star);
        for category in Category::ALL {
            assert!(state.history.recent(category).is_empty());
        }
    }

    #[test]
    fn correct_star_answer_moves_forward() {
        let mut state = two_player_game();
        state.step(TurnAction::roll_value(0, 5)).unwrap();
        let correct = state.pending_question().unwrap().correct;
        state.step(TurnAction::answer(0, correct)).unwrap();
        let position = state.players[0].position;
        assert!((6..=8).contains(&position), "landed on {position}");
        assert_eq!(state.players[0].correct_answers, 0);
    }

    #[test]
    fn wrong_star_answer_keeps_roll() {
        let mut state = two_player_game();
        state.step(TurnAction::roll_value(0, 5)).unwrap();
        let question = state.pending_question().unwrap();
        let wrong = (question.correct + 1) % question.options.len();
        state.step(TurnAction::answer(0, wrong)).unwrap();
        assert_eq!(state.players[0].position, 5);
    }

    #[test]
    fn prayer_tile_waits_for_category() {
        let mut state = two_player_game();
        state.players[0].position = 8;
        // 8 + 4 lands on the prayer tile at 12.
        state.step(TurnAction::roll_value(0, 4)).unwrap();
        assert_eq!(state.phase, GamePhase::AwaitingCategory);
        assert_eq!(state.legal_actions().len(), 3);

        state
            .step(TurnAction::choose_category(0, Category::Daily))
            .unwrap();
        let pending = state.pending().unwrap();
        assert_eq!(pending.category, Category::Daily);
        assert_eq!(pending.source, QuestionSource::Prayer);
        assert_eq!(state.history.recent(Category::Daily), &[pending.index]);
    }

    #[test]
    fn prayer_rewards_two_and_penalises_one() {
        let mut state = two_player_game();
        state.players[0].position = 8;
        state.step(TurnAction::roll_value(0, 4)).unwrap();
        state
            .step(TurnAction::choose_category(0, Category::Daily))
            .unwrap();
        let correct = state.pending_question().unwrap().correct;
        state.step(TurnAction::answer(0, correct)).unwrap();
        assert_eq!(state.players[0].position, 14);
        assert_eq!(state.players[0].correct_answers, 1);

        state.players[1].position = 8;
        state.step(TurnAction::roll_value(1, 4)).unwrap();
        state
            .step(TurnAction::choose_category(1, Category::Special))
            .unwrap();
        let question = state.pending_question().unwrap();
        let wrong = (question.correct + 1) % question.options.len();
        state.step(TurnAction::answer(1, wrong)).unwrap();
        assert_eq!(state.players[1].position, 11);
    }

    #[test]
    fn reaching_end_wins_immediately() {
        let mut state = two_player_game();
        state.players[0].position = 53;
        state.players[0].correct_answers = 6;
        let outcome = state.step(TurnAction::roll_value(0, 4)).unwrap();
        assert!(outcome.done);
        assert_eq!(state.players[0].position, 55);
        assert_eq!(state.phase, GamePhase::Completed { winner: 0 });
        assert_eq!(
            outcome.events.last(),
            Some(&GameEvent::GameWon {
                winner: 0,
                correct_answers: 6
            })
        );
        assert!(matches!(
            state.step(TurnAction::roll(0)),
            Err(GameError::GameFinished)
        ));
        assert!(state.legal_actions().is_empty());
    }

    #[test]
    fn quit_abandons_without_rollback() {
        let mut state = two_player_game();
        state.step(TurnAction::roll_value(0, 2)).unwrap();
        let outcome = state.step(TurnAction::quit(0)).unwrap();
        assert!(outcome.done);
        assert_eq!(state.phase, GamePhase::Abandoned);
        assert_eq!(state.players[0].position, 2);
        assert_eq!(state.history.recent(Category::Food).len(), 1);
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn round_robin_wraps_over_all_seats() {
        let mut state = GameState::standard(GameConfig {
            num_players: 3,
            ..GameConfig::default()
        });
        // Start -> black hole at 4 -> back to start, a turn with no question.
        for expected in [0, 1, 2, 0] {
            assert_eq!(state.current_player, expected);
            state.step(TurnAction::roll_value(expected, 4)).unwrap();
        }
        assert_eq!(state.turn, 4);
    }

    #[test]
    fn same_seed_replays_identically() {
        let run = || {
            let mut state = two_player_game();
            let mut log = Vec::new();
            for _ in 0..40 {
                if state.is_finished() {
                    break;
                }
                let action = state.legal_actions()[0].clone();
                log.extend(state.step(action).unwrap().events);
            }
            log
        };
        assert_eq!(run(), run());
    }
}
