//! Run state definitions

use colored::Color;
use serde::{Deserialize, Serialize};

/// Lifecycle of a SequenceEngine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// No seed yet, or cleared
    #[default]
    Idle,
    /// Seeded, no repeat seen so far
    Running,
    /// The last iterate repeated an earlier one; terminal until reset
    Cycled,
}

impl RunStatus {
    /// Can advance() be called?
    pub fn can_advance(&self) -> bool {
        *self == RunStatus::Running
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunStatus::Idle => "IDLE",
            RunStatus::Running => "RUNNING",
            RunStatus::Cycled => "CYCLED",
        };
        write!(f, "{}", name)
    }
}

/// State of a timer-driven run as seen by its controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverStatus {
    /// No run yet (nothing to stop or clear)
    Empty,
    /// Timer is stepping the engine
    Running,
    /// Timer stopped by the user, can resume
    Paused,
    /// Cycle reached, only clear is possible
    Stuck,
}

impl DriverStatus {
    /// Terminal color for status lines
    pub fn color(&self) -> Color {
        match self {
            DriverStatus::Empty => Color::BrightBlack,
            DriverStatus::Running => Color::Green,
            DriverStatus::Paused => Color::Yellow,
            DriverStatus::Stuck => Color::Red,
        }
    }

    /// Is the Go/Stop control usable?
    pub fn go_stop_enabled(&self) -> bool {
        *self != DriverStatus::Stuck
    }

    /// Is the Clear control usable?
    pub fn clear_enabled(&self) -> bool {
        matches!(self, DriverStatus::Paused | DriverStatus::Stuck)
    }
}

impl std::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DriverStatus::Empty => "EMPTY",
            DriverStatus::Running => "RUNNING",
            DriverStatus::Paused => "PAUSED",
            DriverStatus::Stuck => "STUCK",
        };
        write!(f, "{}", name)
    }
}
