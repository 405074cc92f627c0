//! Core types for midsquare

mod state;
mod digits;
mod split;
mod seen;
mod cycle;
mod output;
mod reason;

pub use state::{RunStatus, DriverStatus};
pub use digits::{DigitString, validate_digits, MAX_DIGITS};
pub use split::SplitSquare;
pub use seen::SeenSet;
pub use cycle::CycleRange;
pub use output::{StepOutput, RunReport, highlight_iterate, seed_terminal_string};
pub use reason::{SequenceError, ErrorKind};
