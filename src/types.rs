use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Question deck a category tile draws from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Food,
    Daily,
    Special,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Food, Category::Daily, Category::Special];

    pub const fn index(self) -> usize {
        match self {
            Category::Food => 0,
            Category::Daily => 1,
            Category::Special => 2,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
pub enum TileKind {
    #[strum(serialize = "START")]
    #[serde(rename = "START")]
    Start,
    #[strum(serialize = "END")]
    #[serde(rename = "END")]
    End,
    Food,
    Daily,
    Special,
    Star,
    Prayer,
    #[strum(serialize = "Black_Hole")]
    #[serde(rename = "Black_Hole")]
    BlackHole,
}

impl TileKind {
    /// Deck drawn from when landing on this tile, for the three category tiles.
    pub const fn category(self) -> Option<Category> {
        match self {
            TileKind::Food => Some(Category::Food),
            TileKind::Daily => Some(Category::Daily),
            TileKind::Special => Some(Category::Special),
            _ => None,
        }
    }

    /// Single-glyph label used by the board renderer.
    pub const fn glyph(self) -> char {
        match self {
            TileKind::Start => 'S',
            TileKind::End => 'E',
            TileKind::Food => 'F',
            TileKind::Daily => 'D',
            TileKind::Special => 'X',
            TileKind::Star => '*',
            TileKind::Prayer => 'P',
            TileKind::BlackHole => '@',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Roll,
    ChooseCategory,
    Answer,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPrompt {
    Roll,
    ChooseCategory,
    AnswerQuestion,
}
