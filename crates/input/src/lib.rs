//! Terminal input for the game shell.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. The mapping
//! is a pure function of the key, so it can be tested without a terminal.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, is_key_down, should_quit};
