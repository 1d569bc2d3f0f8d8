use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::TileKind;

pub const BOARD_SIZE: usize = 56;
pub const COLUMN_HEIGHT: usize = 7;
pub const COLUMNS: usize = 8;

use TileKind::{BlackHole, Daily, End, Food, Prayer, Special, Star, Start};

/// Hand-authored track: START, seven columns of seven tiles, and a last column of six ending in END.
#[rustfmt::skip]
pub const STANDARD_LAYOUT: [TileKind; BOARD_SIZE] = [
    Start,
    Daily, Food, Special, BlackHole, Star, Daily, Food,
    Special, Star, Food, Daily, Prayer, BlackHole, Star,
    Food, Daily, BlackHole, Special, Star, Food, Daily,
    Prayer, Special, Star, BlackHole, Daily, Prayer, Special,
    Star, Food, Daily, Prayer, BlackHole, Star, Food,
    Daily, Prayer, Special, Star, Food, BlackHole, Prayer,
    Special, Star, Food, Daily, Prayer, Special, Star,
    Prayer, Daily, Special, Food, Star, End,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("first tile must be START, found {0}")]
    MissingStart(TileKind),
    #[error("last tile must be END, found {0}")]
    MissingEnd(TileKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<TileKind>,
}

impl Board {
    pub fn standard() -> Self {
        Self::from_layout(&STANDARD_LAYOUT).expect("standard layout holds exactly 56 tiles")
    }

    pub fn from_layout(layout: &[TileKind]) -> Result<Self, BoardError> {
        if layout.len() != BOARD_SIZE {
            return Err(BoardError::TileCountMismatch {
                expected: BOARD_SIZE,
                actual: layout.len(),
            });
        }
        if layout[0] != TileKind::Start {
            return Err(BoardError::MissingStart(layout[0]));
        }
        let last = layout[BOARD_SIZE - 1];
        if last != TileKind::End {
            return Err(BoardError::MissingEnd(last));
        }
        Ok(Self {
            tiles: layout.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn end_index(&self) -> usize {
        self.tiles.len() - 1
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<TileKind> {
        self.tiles.get(index).copied()
    }

    /// Forward move clamped to END; a roll never bounces back.
    pub fn resolve_move(&self, position: usize, roll: usize) -> usize {
        position.saturating_add(roll).min(self.end_index())
    }

    /// Nearest black hole strictly before `index`, or START when there is none.
    pub fn previous_black_hole(&self, index: usize) -> usize {
        let upper = index.min(self.tiles.len());
        self.tiles[..upper]
            .iter()
            .rposition(|tile| *tile == TileKind::BlackHole)
            .unwrap_or(0)
    }

    /// Column/row of a tile on the serpentine display grid. Row 0 is the bottom row.
    pub fn grid_coords(index: usize) -> (usize, usize) {
        let column = index / COLUMN_HEIGHT;
        let offset = index % COLUMN_HEIGHT;
        let row = if column % 2 == 0 {
            offset
        } else {
            COLUMN_HEIGHT - 1 - offset
        };
        (column, row)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyphs: String = self.tiles.iter().map(|tile| tile.glyph()).collect();
        write!(f, "{glyphs}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_board_has_fixed_endpoints() {
        let board = Board::standard();
        assert_eq!(board.len(), BOARD_SIZE);
        assert_eq!(board.tile(0), Some(TileKind::Start));
        assert_eq!(board.tile(55), Some(TileKind::End));
        assert_eq!(board.tile(56), None);
    }

    #[test]
    fn standard_black_holes() {
        let board = Board::standard();
        let holes: Vec<usize> = board
            .tiles()
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == TileKind::BlackHole)
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(holes, vec![4, 13, 17, 25, 33, 41]);
    }

    #[test]
    fn rejects_short_layout() {
        let err = Board::from_layout(&STANDARD_LAYOUT[..55]).unwrap_err();
        assert_eq!(
            err,
            BoardError::TileCountMismatch {
                expected: 56,
                actual: 55
            }
        );
    }

    #[test]
    fn rejects_misplaced_endpoints() {
        let mut layout = STANDARD_LAYOUT;
        layout[0] = TileKind::Food;
        assert_eq!(
            Board::from_layout(&layout).unwrap_err(),
            BoardError::MissingStart(TileKind::Food)
        );

        let mut layout = STANDARD_LAYOUT;
        layout[55] = TileKind::Star;
        assert_eq!(
            Board::from_layout(&layout).unwrap_err(),
            BoardError::MissingEnd(TileKind::Star)
        );
    }

    #[test]
    fn moves_clamp_at_end() {
        let board = Board::standard();
        assert_eq!(board.resolve_move(53, 4), 55);
        assert_eq!(board.resolve_move(55, 6), 55);
        assert_eq!(board.resolve_move(0, 3), 3);
    }

    #[test]
    fn black_hole_rewind_is_strictly_backwards() {
        let board = Board::standard();
        assert_eq!(board.previous_black_hole(4), 0);
        assert_eq!(board.previous_black_hole(13), 4);
        assert_eq!(board.previous_black_hole(41), 33);
        assert_eq!(board.previous_black_hole(0), 0);
    }

    #[test]
    fn grid_is_serpentine() {
        assert_eq!(Board::grid_coords(0), (0, 0));
        assert_eq!(Board::grid_coords(6), (0, 6));
        assert_eq!(Board::grid_coords(7), (1, 6));
        assert_eq!(Board::grid_coords(13), (1, 0));
        assert_eq!(Board::grid_coords(55), (7, 0));
    }
}
