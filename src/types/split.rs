//! The three segments of a split square

use serde::{Deserialize, Serialize};

/// Prefix, middle and suffix of a digit string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSquare {
    /// Leading digits, discarded
    pub hi: String,
    /// Middle digits, the next iterate
    pub mid: String,
    /// Trailing digits, discarded
    pub lo: String,
}

impl SplitSquare {
    /// Rebuild the string that was split
    pub fn concat(&self) -> String {
        let mut s = String::with_capacity(self.total_len());
        s.push_str(&self.hi);
        s.push_str(&self.mid);
        s.push_str(&self.lo);
        s
    }

    /// Sum of segment lengths
    pub fn total_len(&self) -> usize {
        self.hi.len() + self.mid.len() + self.lo.len()
    }

    /// Segments have the L/4, L/2, L/4 layout
    pub fn is_symmetric(&self) -> bool {
        self.hi.len() == self.lo.len() && self.mid.len() == self.hi.len() * 2
    }
}
