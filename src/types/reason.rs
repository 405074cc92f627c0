//! Reason codes for rejected input and broken preconditions
//!
//! R1xx: invalid input (caller should reject at the boundary)
//! R2xx: precondition (operation called in the wrong engine state)
//! R3xx: invariant violation (internal bookkeeping is corrupt, fatal)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad error category, used by callers to decide how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidInput,
    PrecondInvalid,
    InvariantViolation,
}

/// Errors produced by the middle-square core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[allow(non_camel_case_types)]
pub enum SequenceError {
    // =========================================================================
    // R100: Invalid input
    // =========================================================================
    /// A character outside '0'..='9'
    #[error("R101_NON_DIGIT: {found:?} at position {position} is not a decimal digit")]
    R101_NON_DIGIT { position: usize, found: char },

    /// String longer than the requested width (never truncated)
    #[error("R102_OVER_LENGTH: {len} digits do not fit in width {width}")]
    R102_OVER_LENGTH { len: usize, width: usize },

    /// Empty digit string where a value is required
    #[error("R103_EMPTY: empty digit string")]
    R103_EMPTY,

    /// Width outside the supported range
    #[error("R104_WIDTH_OUT_OF_RANGE: width {width} not in {min}..={max}")]
    R104_WIDTH_OUT_OF_RANGE { width: usize, min: usize, max: usize },

    // =========================================================================
    // R200: Preconditions
    // =========================================================================
    /// advance() before start()
    #[error("R201_NOT_STARTED: no run in progress")]
    R201_NOT_STARTED,

    /// advance() after the cycle was already detected
    #[error("R202_ALREADY_CYCLED: run already reached a cycle")]
    R202_ALREADY_CYCLED,

    /// Cycle requested before one was detected
    #[error("R203_NOT_CYCLED: run has not reached a cycle yet")]
    R203_NOT_CYCLED,

    // =========================================================================
    // R300: Invariants
    // =========================================================================
    /// Last iterate has no earlier match in history
    #[error("R301_CYCLE_MATCH_MISSING: {value} at index {index} has no earlier occurrence")]
    R301_CYCLE_MATCH_MISSING { value: String, index: usize },

    /// Cycle lookup on an empty history
    #[error("R302_HISTORY_EMPTY: cannot locate a cycle in an empty history")]
    R302_HISTORY_EMPTY,

    /// More steps than distinct values without a repeat
    #[error("R303_CYCLE_BOUND_EXCEEDED: no repeat after {steps} steps")]
    R303_CYCLE_BOUND_EXCEEDED { steps: usize },
}

impl SequenceError {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_NON_DIGIT { .. } => "R101_NON_DIGIT",
            Self::R102_OVER_LENGTH { .. } => "R102_OVER_LENGTH",
            Self::R103_EMPTY => "R103_EMPTY",
            Self::R104_WIDTH_OUT_OF_RANGE { .. } => "R104_WIDTH_OUT_OF_RANGE",
            Self::R201_NOT_STARTED => "R201_NOT_STARTED",
            Self::R202_ALREADY_CYCLED => "R202_ALREADY_CYCLED",
            Self::R203_NOT_CYCLED => "R203_NOT_CYCLED",
            Self::R301_CYCLE_MATCH_MISSING { .. } => "R301_CYCLE_MATCH_MISSING",
            Self::R302_HISTORY_EMPTY => "R302_HISTORY_EMPTY",
            Self::R303_CYCLE_BOUND_EXCEEDED { .. } => "R303_CYCLE_BOUND_EXCEEDED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_NON_DIGIT { .. } => "Digit string contains a non-digit",
            Self::R102_OVER_LENGTH { .. } => "Digit string longer than width",
            Self::R103_EMPTY => "Digit string is empty",
            Self::R104_WIDTH_OUT_OF_RANGE { .. } => "Width not supported",
            Self::R201_NOT_STARTED => "Run not started",
            Self::R202_ALREADY_CYCLED => "Run already cycled",
            Self::R203_NOT_CYCLED => "Run not cycled yet",
            Self::R301_CYCLE_MATCH_MISSING { .. } => "Cycle has no earlier match",
            Self::R302_HISTORY_EMPTY => "History is empty",
            Self::R303_CYCLE_BOUND_EXCEEDED { .. } => "No repeat within the value space",
        }
    }

    /// Error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::R101_NON_DIGIT { .. }
            | Self::R102_OVER_LENGTH { .. }
            | Self::R103_EMPTY
            | Self::R104_WIDTH_OUT_OF_RANGE { .. } => ErrorKind::InvalidInput,
            Self::R201_NOT_STARTED | Self::R202_ALREADY_CYCLED | Self::R203_NOT_CYCLED => {
                ErrorKind::PrecondInvalid
            }
            Self::R301_CYCLE_MATCH_MISSING { .. }
            | Self::R302_HISTORY_EMPTY
            | Self::R303_CYCLE_BOUND_EXCEEDED { .. } => ErrorKind::InvariantViolation,
        }
    }

    /// Fatal errors abort the run instead of being handled
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::InvariantViolation
    }
}
