use itertools::Itertools;

use crate::board::{Board, COLUMN_HEIGHT, COLUMNS};
use crate::game::game::Game;
use crate::types::TileKind;

const CELL_WIDTH: usize = 9;

/// Location of a seat marker inside the rendered text, for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    pub row: usize,
    pub col: usize,
    pub player: usize,
}

#[derive(Debug, Clone)]
pub struct RenderedBoard {
    pub text: String,
    pub token_spans: Vec<TokenSpan>,
}

pub fn display_board(game: &Game) {
    println!("{}", render_board(game).text);
}

/// Draws the track as eight serpentine columns, START bottom-left.
///
/// Each cell reads `NN G 1234`: tile index, tile glyph, then the seats standing on it.
pub fn render_board(game: &Game) -> RenderedBoard {
    let board = &game.state.board;
    let mut grid: Vec<Vec<String>> = vec![vec![" ".repeat(CELL_WIDTH); COLUMNS]; COLUMN_HEIGHT];
    let mut token_spans = Vec::new();

    for (index, tile) in board.tiles().iter().enumerate() {
        let (column, row) = Board::grid_coords(index);
        let line = COLUMN_HEIGHT - 1 - row;
        let occupants: Vec<usize> = game
            .state
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.position == index)
            .map(|(idx, _)| idx)
            .collect();

        let seats: String = occupants
            .iter()
            .map(|idx| char::from_digit(game.state.players[*idx].seat as u32, 10).unwrap_or('?'))
            .collect();
        let cell = format!("{:>2} {} {:<4}", index, tile.glyph(), seats);

        let cell_start = column * CELL_WIDTH;
        for (offset, player) in occupants.iter().enumerate() {
            token_spans.push(TokenSpan {
                row: line,
                col: cell_start + 5 + offset,
                player: *player,
            });
        }
        grid[line][column] = cell;
    }

    let mut text = String::new();
    for cells in &grid {
        text.push_str(cells.concat().trim_end());
        text.push('\n');
    }
    text.push('\n');
    text.push_str(&legend());

    RenderedBoard { text, token_spans }
}

pub fn legend() -> String {
    [
        TileKind::Food,
        TileKind::Daily,
        TileKind::Special,
        TileKind::Star,
        TileKind::Prayer,
        TileKind::BlackHole,
    ]
    .iter()
    .map(|tile| format!("{}={}", tile.glyph(), tile))
    .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn renders_every_tile_once() {
        let game = Game::new(GameConfig::default()).unwrap();
        let rendered = render_board(&game);
        let rows: Vec<&str> = rendered.text.lines().take(COLUMN_HEIGHT).collect();
        assert_eq!(rows.len(), COLUMN_HEIGHT);
        // START sits bottom-left with both seats on it.
        assert!(rows[COLUMN_HEIGHT - 1].starts_with(" 0 S 12"));
        // END tops the last column's bottom cell.
        assert!(rows[COLUMN_HEIGHT - 1].contains("55 E"));
        assert_eq!(rendered.token_spans.len(), 2);
    }

    #[test]
    fn token_spans_point_at_seat_digits() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.state.players[1].position = 9;
        let rendered = render_board(&game);
        let lines: Vec<Vec<char>> = rendered.text.lines().map(|l| l.chars().collect()).collect();
        for span in &rendered.token_spans {
            let seat = game.state.players[span.player].seat;
            assert_eq!(lines[span.row][span.col], char::from_digit(seat as u32, 10).unwrap());
        }
    }
}
