//! Core modules for midsquare

pub mod digits;
pub mod splitter;
pub mod engine;
pub mod cycle;
pub mod seed;
pub mod api;

pub use digits::{pad_left_zeros, square, square_str};
pub use splitter::{split, split_lengths};
pub use engine::SequenceEngine;
pub use cycle::locate_cycle;
pub use seed::{sanitize_seed_input, seed_from_input, random_seed};
pub use api::{create_router, create_router_with_state, forward_steps, run_server, AppState};
