//! Midsquare: middle-square sequence generator
//!
//! Squares a fixed-width decimal digit string, keeps the middle digits,
//! and repeats until a value comes around a second time. The history up
//! to that point is kept so the repeating cycle can be reported.
//!
//! Path: seed → SequenceEngine::advance → split → CycleLocator → output

pub mod core;
pub mod types;

// =============================================================================
// WIDTHS
// =============================================================================

/// Default iterate width (the classic four-digit demo)
pub const DEFAULT_WIDTH: usize = 4;

/// Largest supported iterate width.
/// The square of a 9-digit value has at most 18 digits and fits in a u64.
pub const MAX_WIDTH: usize = 9;

/// Smallest supported iterate width
pub const MIN_WIDTH: usize = 1;

// =============================================================================
// DRIVER
// =============================================================================

/// Time between automatic steps (milliseconds)
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 50;

/// Default API listen address
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Capacity of the per-run live update channel
pub const UPDATE_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";

/// Number of distinct values of the given width, 10^width
pub fn value_space(width: usize) -> u64 {
    10u64.pow(width as u32)
}
