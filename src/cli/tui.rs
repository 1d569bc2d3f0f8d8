use std::collections::HashMap;
use std::io::{self, Stdout, stdout};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::Frame;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::cli::board_display::render_board as render_ascii_board;
use crate::game::action::{ActionPayload, TurnAction};
use crate::game::game::Game;
use crate::game::state::{GameEvent, GamePhase, MoveCause, QuestionSource};
use crate::types::ActionType;

pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// One decision screen for a human seat: board, standings, prompt, and recent events.
pub struct TuiApp<'a> {
    game: &'a Game,
    seat: usize,
    actions: Vec<TurnAction>,
    selected_action_idx: usize,
    show_help: bool,
    selected_action: Option<TurnAction>,
    history_scroll: u16,
    history_max_scroll: u16,
}

impl<'a> TuiApp<'a> {
    pub fn new(game: &'a Game, seat: usize, actions: Vec<TurnAction>) -> Self {
        Self {
            game,
            seat,
            actions,
            selected_action_idx: 0,
            show_help: false,
            selected_action: None,
            history_scroll: 0,
            history_max_scroll: 0,
        }
    }

    /// Returns the chosen action, or `None` when the player quits.
    pub fn run(&mut self) -> io::Result<Option<TurnAction>> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = loop {
            if let Err(err) = terminal.draw(|f| self.render(f)) {
                break Err(err);
            }

            match crossterm::event::poll(Duration::from_millis(50)) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            break Ok(self.selected_action.take());
                        }
                    }
                    Ok(_) => {}
                    Err(err) => break Err(err),
                },
                Ok(false) => {}
                Err(err) => break Err(err),
            }
        };

        // Always restore the terminal, even on error.
        let _ = terminal.clear();
        let _ = disable_raw_mode();
        let _ = execute!(terminal.backend_mut(), DisableMouseCapture);
        let _ = terminal.show_cursor();

        result
    }

    /// True once the screen should close.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Up => self.adjust_history_scroll(-1),
                KeyCode::Down => self.adjust_history_scroll(1),
                KeyCode::Char('c') => {
                    self.selected_action = None;
                    return true;
                }
                _ => {}
            }
            return false;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.selected_action = None;
                return true;
            }
            KeyCode::Char('h') => {
                self.show_help = !self.show_help;
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                if idx < self.actions.len() {
                    self.selected_action = Some(self.actions[idx].clone());
                    return true;
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                if let Some(answer) = self
                    .actions
                    .iter()
                    .find(|a| a.action_type == ActionType::Answer)
                {
                    self.selected_action = Some(TurnAction::skip_answer(answer.player_index));
                    return true;
                }
            }
            KeyCode::Char('r') | KeyCode::Char(' ') => {
                if let Some(roll) = self
                    .actions
                    .iter()
                    .find(|a| a.action_type == ActionType::Roll)
                {
                    self.selected_action = Some(roll.clone());
                    return true;
                }
            }
            KeyCode::Up => {
                self.selected_action_idx = self.selected_action_idx.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_action_idx + 1 < self.actions.len() {
                    self.selected_action_idx += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(action) = self.actions.get(self.selected_action_idx) {
                    self.selected_action = Some(action.clone());
                    return true;
                }
            }
            _ => {}
        }
        false
    }

    fn render(&mut self, f: &mut Frame<'_>) {
        let area = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(20), Constraint::Length(3)])
            .split(area);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[0]);

        self.render_board(f, main_chunks[0]);
        self.render_right_panel(f, main_chunks[1]);
        self.render_status_bar(f, chunks[1]);
    }

    fn render_board(&self, f: &mut Frame<'_>, area: Rect) {
        let rendered_board = render_ascii_board(self.game);
        let token_lookup: HashMap<(usize, usize), usize> = rendered_board
            .token_spans
            .iter()
            .map(|span| ((span.row, span.col), span.player))
            .collect();

        let lines: Vec<Line<'_>> = rendered_board
            .text
            .lines()
            .enumerate()
            .map(|(row_idx, line)| {
                let spans: Vec<Span<'_>> = line
                    .chars()
                    .enumerate()
                    .map(|(col, ch)| {
                        let style = match token_lookup.get(&(row_idx, col)) {
                            Some(player) => Style::default()
                                .fg(color_for_seat(*player))
                                .add_modifier(Modifier::BOLD),
                            None => color_for_board_char(ch),
                        };
                        Span::styled(ch.to_string(), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Board")
            .title_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, area);
    }

    fn render_right_panel(&mut self, f: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(45),
                Constraint::Percentage(30),
            ])
            .split(area);

        self.render_game_state(f, chunks[0]);
        self.render_prompt(f, chunks[1]);
        self.render_history_panel(f, chunks[2]);
    }

    fn render_game_state(&self, f: &mut Frame<'_>, area: Rect) {
        let state = &self.game.state;
        let mut lines: Vec<Line<'_>> = vec![Line::from(vec![
            Span::raw("Turn "),
            Span::styled(
                format!("{}", state.turn + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(match state.last_roll {
                Some(roll) => format!("   Last roll: {roll}"),
                None => String::new(),
            }),
        ])];

        for (idx, player) in state.players.iter().enumerate() {
            let marker = if idx == state.current_player { "> " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{} {}", player.seat, player.name),
                    Style::default()
                        .fg(color_for_seat(idx))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    "  tile {:>2}/{}  correct {}",
                    player.position,
                    state.board.end_index(),
                    player.correct_answers
                )),
            ]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Players"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_prompt(&self, f: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(3)])
            .split(area);

        let state = &self.game.state;
        let player_name = &state.players[self.seat].name;
        let (title, header) = match state.pending_question() {
            Some(question) => {
                let source = match state.pending().map(|p| p.source) {
                    Some(QuestionSource::Star) => "Bonus question",
                    Some(QuestionSource::Prayer) => "Prayer question",
                    _ => "Question",
                };
                (
                    format!("{source} ({})", question.category),
                    question.prompt.clone(),
                )
            }
            None if self
                .actions
                .iter()
                .any(|a| a.action_type == ActionType::ChooseCategory) =>
            {
                (
                    "Prayer tile".to_string(),
                    format!("{player_name}, choose a category for your question."),
                )
            }
            None => (
                "Your turn".to_string(),
                format!("{player_name}, press Enter or r to roll the die."),
            ),
        };

        let header = Paragraph::new(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        f.render_widget(header, chunks[0]);

        let items: Vec<ListItem<'_>> = self
            .actions
            .iter()
            .enumerate()
            .map(|(idx, action)| {
                let style = if idx == self.selected_action_idx {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!("[{}] {}", idx + 1, self.action_label(action))).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Choices"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected_action_idx));
        f.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn render_history_panel(&mut self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("What happened");

        let lines: Vec<Line<'_>> = if self.game.events.is_empty() {
            vec![Line::from("No moves yet.")]
        } else {
            self.game
                .events
                .iter()
                .filter_map(|event| describe_event(self.game, event))
                .map(Line::from)
                .collect()
        };

        let viewport_height = area.height.saturating_sub(2);
        let content_height = lines.len() as u16;
        let max_scroll = content_height.saturating_sub(viewport_height);
        if self.history_scroll == self.history_max_scroll || self.history_scroll > max_scroll {
            self.history_scroll = max_scroll;
        }
        self.history_max_scroll = max_scroll;

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.history_scroll, 0));

        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame<'_>, area: Rect) {
        let help_text = if self.show_help {
            "Up/Down: Navigate | Enter: Select | 1-4: Pick option | r: Roll | s: Skip question | Ctrl+Up/Down: Scroll log | h: Toggle Help | q/Esc: Quit"
        } else {
            "Press 'h' for help | q to quit"
        };

        let paragraph = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center);

        f.render_widget(paragraph, area);
    }

    fn action_label(&self, action: &TurnAction) -> String {
        match (action.action_type, action.payload) {
            (ActionType::Roll, _) => "Roll the die".to_string(),
            (ActionType::ChooseCategory, ActionPayload::Category(category)) => {
                category.to_string()
            }
            (ActionType::Answer, ActionPayload::Choice(choice)) => self
                .game
                .state
                .pending_question()
                .and_then(|q| q.options.get(choice).cloned())
                .unwrap_or_else(|| format!("Option {}", choice + 1)),
            (action_type, _) => action_type.to_string(),
        }
    }

    fn adjust_history_scroll(&mut self, delta: i16) {
        let current_val = self.history_scroll as i32 + delta as i32;
        self.history_scroll = current_val.clamp(0, self.history_max_scroll as i32) as u16;
    }
}

/// Announces a bot's turn once, at its roll rather than at every decision.
pub fn turn_banner(game: &Game, human_seat: usize) -> Option<String> {
    let state = &game.state;
    if state.current_player == human_seat || state.phase != GamePhase::AwaitingRoll {
        return None;
    }
    Some(format!("{} is thinking...", state.current().name))
}

/// One line of narration per event worth telling the players about.
pub fn describe_event(game: &Game, event: &GameEvent) -> Option<String> {
    let name = |idx: usize| {
        game.state
            .players
            .get(idx)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Player {}", idx + 1))
    };
    let text = match event {
        GameEvent::DiceRolled { player, value } => format!("{} rolled a {value}", name(*player)),
        GameEvent::Moved {
            player,
            from,
            to,
            cause,
        } => match cause {
            MoveCause::Roll => format!("{} moved {from} -> {to}", name(*player)),
            MoveCause::WrongAnswer => {
                format!("Wrong answer! {} moves back {}", name(*player), from - to)
            }
            MoveCause::BlackHole => format!("Black hole! {} falls back to {to}", name(*player)),
            MoveCause::StarBonus => {
                format!("Star bonus! {} moves forward {}", name(*player), to - from)
            }
            MoveCause::PrayerBonus => {
                format!("Prayer answered! {} moves forward {}", name(*player), to - from)
            }
            MoveCause::PrayerPenalty => format!("{} moves back {}", name(*player), from - to),
        },
        GameEvent::LandedOn { .. } => return None,
        GameEvent::QuestionAsked {
            player, category, ..
        } => format!("{} draws a {category} question", name(*player)),
        GameEvent::Answered {
            player, correct, ..
        } => {
            let verdict = if *correct { "Correct!" } else { "Incorrect!" };
            format!("{verdict} ({})", name(*player))
        }
        GameEvent::TurnAdvanced { next_player } => format!("{}'s turn", name(*next_player)),
        GameEvent::GameWon {
            winner,
            correct_answers,
        } => format!(
            "{} wins with {correct_answers} correct answers!",
            name(*winner)
        ),
        GameEvent::GameAbandoned { player } => format!("{} left the game", name(*player)),
    };
    Some(text)
}

fn color_for_board_char(c: char) -> Style {
    match c {
        'F' => Style::default().fg(Color::Blue),
        'D' => Style::default().fg(Color::Green),
        'X' => Style::default().fg(Color::Yellow),
        '*' => Style::default().fg(Color::LightMagenta),
        'P' => Style::default().fg(Color::LightYellow),
        '@' => Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        'S' | 'E' => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        _ => Style::default(),
    }
}

pub fn color_for_seat(idx: usize) -> Color {
    match idx {
        0 => Color::Red,
        1 => Color::Cyan,
        2 => Color::Green,
        _ => Color::Magenta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn press(app: &mut TuiApp<'_>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn skip_key_dismisses_open_question() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        // Tile 2 is Food.
        game.execute(TurnAction::roll_value(0, 2)).unwrap();
        let actions = game.state.legal_actions();
        let mut app = TuiApp::new(&game, 0, actions);
        assert!(press(&mut app, KeyCode::Char('s')));
        assert_eq!(app.selected_action, Some(TurnAction::skip_answer(0)));
    }

    #[test]
    fn skip_key_is_ignored_without_question() {
        let game = Game::new(GameConfig::default()).unwrap();
        let mut app = TuiApp::new(&game, 0, game.state.legal_actions());
        assert!(!press(&mut app, KeyCode::Char('s')));
        assert!(press(&mut app, KeyCode::Esc));
        assert_eq!(app.selected_action, None);
    }

    #[test]
    fn bot_turn_is_announced_only_at_roll() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(turn_banner(&game, 0), None);
        // Black hole at 4 hands the turn to seat 2 straight away.
        game.execute(TurnAction::roll_value(0, 4)).unwrap();
        assert_eq!(
            turn_banner(&game, 0),
            Some("Player 2 is thinking...".to_string())
        );
        game.execute(TurnAction::roll_value(1, 2)).unwrap();
        assert!(game.state.pending().is_some());
        assert_eq!(turn_banner(&game, 0), None);
    }

    #[test]
    fn narrates_black_hole_and_turn_change() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.execute(TurnAction::roll_value(0, 4)).unwrap();
        let lines: Vec<String> = game
            .events
            .iter()
            .filter_map(|event| describe_event(&game, event))
            .collect();
        assert_eq!(
            lines,
            vec![
                "Player 1 rolled a 4".to_string(),
                "Player 1 moved 0 -> 4".to_string(),
                "Black hole! Player 1 falls back to 0".to_string(),
                "Player 2's turn".to_string(),
            ]
        );
    }
}
