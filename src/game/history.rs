use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::bank::{DeckError, QuestionBank};
use crate::types::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Refill once fewer than this many questions remain unused in a category.
    pub refill_threshold: usize,
    /// Upper bound on history entries kept across a refill.
    pub max_retained: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            refill_threshold: 3,
            max_retained: 4,
        }
    }
}

/// Recently asked question indices per category, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTracker {
    config: HistoryConfig,
    recent: [Vec<usize>; 3],
}

impl HistoryTracker {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            recent: Default::default(),
        }
    }

    pub fn recent(&self, category: Category) -> &[usize] {
        &self.recent[category.index()]
    }

    /// Indices of `category` that are not currently suppressed.
    pub fn eligible(&self, category: Category, total: usize) -> Vec<usize> {
        let recent = &self.recent[category.index()];
        (0..total).filter(|idx| !recent.contains(idx)).collect()
    }

    /// Picks the next question index for `category` and records it.
    pub fn next_question(
        &mut self,
        category: Category,
        bank: &QuestionBank,
        rng: &mut impl Rng,
    ) -> Result<usize, DeckError> {
        let total = bank.len(category);
        if total == 0 {
            return Err(DeckError::EmptyCategory(category));
        }

        let mut eligible = self.eligible(category, total);
        if eligible.is_empty() || eligible.len() < self.config.refill_threshold {
            let keep = self.truncate(category, total);
            debug!(
                %category,
                kept = keep,
                remaining = eligible.len(),
                "question pool running low, trimming history"
            );
            eligible = self.eligible(category, total);
        }

        let chosen = *eligible
            .choose(rng)
            .ok_or(DeckError::EmptyCategory(category))?;
        self.recent[category.index()].push(chosen);
        Ok(chosen)
    }

    /// Drops everything but the newest `min(total / 2, max_retained)` entries.
    fn truncate(&mut self, category: Category, total: usize) -> usize {
        let keep = (total / 2).min(self.config.max_retained);
        let recent = &mut self.recent[category.index()];
        let excess = recent.len().saturating_sub(keep);
        recent.drain(..excess);
        recent.len()
    }
}
