//! Cycle range within a run history

use serde::{Deserialize, Serialize};

/// Inclusive index bounds of the first full cycle in a history.
///
/// `history[start_index] == history[end_index]`; the iterates at
/// `start_index..end_index` repeat forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl CycleRange {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self { start_index, end_index }
    }

    /// Cycle length (a fixed point has length 1)
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    /// Always false for a located cycle
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates before the cycle is entered
    pub fn tail_len(&self) -> usize {
        self.start_index
    }

    /// Is `index` one of the repeating iterates (`start..end`)?
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    /// Is `index` the first repetition that closed the cycle?
    pub fn closes_at(&self, index: usize) -> bool {
        index == self.end_index
    }
}
