//! Dirty-bit table over the value space of one width

use std::collections::HashSet;

use crate::value_space;

/// Widest value space kept as a bitmap (10^6 bits, 125 KB)
pub const DENSE_MAX_WIDTH: usize = 6;

#[derive(Debug, Clone)]
enum Storage {
    /// One bit per value in [0, 10^width)
    Bits { words: Vec<u64>, space: u64 },
    /// Wider runs touch a tiny fraction of their space
    Hashed { set: HashSet<u64>, space: u64 },
}

/// Set of values already emitted in a run.
///
/// Membership and insertion are O(1) over [0, 10^width). Values outside
/// that domain are never members.
#[derive(Debug, Clone)]
pub struct SeenSet {
    storage: Storage,
    count: usize,
}

impl Default for SeenSet {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SeenSet {
    /// Empty set sized for `width`-digit values
    pub fn new(width: usize) -> Self {
        let space = value_space(width);
        let storage = if width <= DENSE_MAX_WIDTH {
            Storage::Bits {
                words: vec![0u64; space.div_ceil(64) as usize],
                space,
            }
        } else {
            Storage::Hashed { set: HashSet::new(), space }
        };
        Self { storage, count: 0 }
    }

    /// Has `value` been marked?
    pub fn contains(&self, value: u64) -> bool {
        match &self.storage {
            Storage::Bits { words, space } => {
                value < *space && words[(value / 64) as usize] & (1 << (value % 64)) != 0
            }
            Storage::Hashed { set, .. } => set.contains(&value),
        }
    }

    /// Mark `value`, returning true if it was not marked before.
    /// Values outside the domain are ignored and return false.
    pub fn insert(&mut self, value: u64) -> bool {
        let added = match &mut self.storage {
            Storage::Bits { words, space } => {
                if value >= *space {
                    return false;
                }
                let word = &mut words[(value / 64) as usize];
                let bit = 1u64 << (value % 64);
                let fresh = *word & bit == 0;
                *word |= bit;
                fresh
            }
            Storage::Hashed { set, space } => value < *space && set.insert(value),
        };
        if added {
            self.count += 1;
        }
        added
    }

    /// Number of marked values
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Size of the value domain
    pub fn domain_size(&self) -> u64 {
        match &self.storage {
            Storage::Bits { space, .. } | Storage::Hashed { space, .. } => *space,
        }
    }
}
