use blessing_journey::board::{BOARD_SIZE, Board};
use blessing_journey::game::{
    GameEvent, GamePhase, GameState, HistoryConfig, MoveCause, QuestionBank, QuestionSource,
    TurnAction,
};
use blessing_journey::{Category, GameConfig, TileKind};

/// START, END, Food everywhere else, with the given overrides.
fn food_board(overrides: &[(usize, TileKind)]) -> Board {
    let mut layout = vec![TileKind::Food; BOARD_SIZE];
    layout[0] = TileKind::Start;
    layout[BOARD_SIZE - 1] = TileKind::End;
    for (index, tile) in overrides {
        layout[*index] = *tile;
    }
    Board::from_layout(&layout).unwrap()
}

fn state_on(board: Board) -> GameState {
    GameState::new(GameConfig::default(), board, QuestionBank::standard())
}

#[test]
fn exact_roll_onto_end_wins() {
    let mut state = GameState::standard(GameConfig::default());
    state.players[0].position = 53;
    let outcome = state.step(TurnAction::roll_value(0, 4)).unwrap();
    assert!(outcome.done);
    assert_eq!(state.players[0].position, 55);
    assert_eq!(state.winner(), Some(0));
}

#[test]
fn black_hole_drops_to_previous_black_hole() {
    let board = food_board(&[(3, TileKind::BlackHole), (10, TileKind::BlackHole)]);
    let mut state = state_on(board);
    state.players[0].position = 6;
    let outcome = state.step(TurnAction::roll_value(0, 4)).unwrap();
    assert_eq!(state.players[0].position, 3);
    assert!(outcome.events.contains(&GameEvent::Moved {
        player: 0,
        from: 10,
        to: 3,
        cause: MoveCause::BlackHole,
    }));
    // A black hole ends the turn without a question.
    assert_eq!(state.current_player, 1);
    assert_eq!(state.phase, GamePhase::AwaitingRoll);
}

#[test]
fn prayer_bonus_clamps_to_end_and_wins() {
    let board = food_board(&[(54, TileKind::Prayer)]);
    let mut state = state_on(board);
    state.players[0].position = 50;
    state.step(TurnAction::roll_value(0, 4)).unwrap();
    assert_eq!(state.phase, GamePhase::AwaitingCategory);

    state
        .step(TurnAction::choose_category(0, Category::Daily))
        .unwrap();
    let pending = state.pending().unwrap();
    assert_eq!(pending.source, QuestionSource::Prayer);
    let correct = state.pending_question().unwrap().correct;

    let outcome = state.step(TurnAction::answer(0, correct)).unwrap();
    assert!(outcome.done);
    assert_eq!(state.players[0].position, 55);
    assert_eq!(
        outcome.events.last(),
        Some(&GameEvent::GameWon {
            winner: 0,
            correct_answers: 1
        })
    );
}

#[test]
fn wrong_answer_near_start_stops_at_start() {
    let mut state = state_on(food_board(&[]));
    state.step(TurnAction::roll_value(0, 1)).unwrap();
    let question = state.pending_question().unwrap();
    let wrong = (question.correct + 1) % question.options.len();
    state.step(TurnAction::answer(0, wrong)).unwrap();
    assert_eq!(state.players[0].position, 0);
}

#[test]
fn choosing_a_category_outside_prayer_is_rejected() {
    let mut state = GameState::standard(GameConfig::default());
    assert!(
        state
            .step(TurnAction::choose_category(0, Category::Food))
            .is_err()
    );
    assert_eq!(state.phase, GamePhase::AwaitingRoll);
}

#[test]
fn food_history_refills_after_thirteen_questions() {
    let mut state = state_on(food_board(&[]));
    let mut seen = Vec::new();
    // Every landing is Food, so each roll draws from the 15-question deck.
    for _ in 0..14 {
        let player = state.current_player;
        state.players[player].position = 1;
        state.step(TurnAction::roll_value(player, 1)).unwrap();
        let pending = state.pending().unwrap();
        seen.push(pending.index);
        let correct = state.pending_question().unwrap().correct;
        state.step(TurnAction::answer(player, correct)).unwrap();
    }
    // The first 13 draws exhaust all but two questions without repeats.
    let mut first: Vec<usize> = seen[..13].to_vec();
    first.sort_unstable();
    first.dedup();
    assert_eq!(first.len(), 13);
    // The 14th draw trims history to the newest 4 first, then records itself.
    assert_eq!(state.history.recent(Category::Food).len(), 5);
    assert_eq!(&state.history.recent(Category::Food)[..4], &seen[9..13]);
}

#[test]
fn exhausted_deck_keeps_serving_without_refill_threshold() {
    let config = GameConfig {
        history: HistoryConfig {
            refill_threshold: 0,
            max_retained: 4,
        },
        ..GameConfig::default()
    };
    let mut state = GameState::new(config, food_board(&[]), QuestionBank::standard());
    // More draws than the 15-question Food deck holds.
    for _ in 0..20 {
        let player = state.current_player;
        state.players[player].position = 1;
        state.step(TurnAction::roll_value(player, 1)).unwrap();
        assert_eq!(state.pending().unwrap().category, Category::Food);
        let correct = state.pending_question().unwrap().correct;
        state.step(TurnAction::answer(player, correct)).unwrap();
        assert_eq!(state.phase, GamePhase::AwaitingRoll);
    }
}
