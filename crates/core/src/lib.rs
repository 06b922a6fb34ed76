//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every rule of the game and none of its I/O. The same seed
//! (or the same injected random source) replays the same session.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of locked cells, row detection and clearing
//! - [`collision`]: placement test against walls, floor and locked cells
//! - [`pieces`]: the seven shapes, clockwise rotation and horizontal kicks
//! - [`rng`]: uniform piece factory over an injected random source
//! - [`scoring`]: line points, level progression and the drop interval curve
//! - [`game_state`]: the session controller driving spawn, fall, lock and clear
//! - [`snapshot`]: read-only copies of a session for renderers
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! // Drops never score; only cleared rows do.
//! assert_eq!(game.score(), 0);
//! assert_eq!(game.pieces_spawned(), 2);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed milliseconds. Once the accumulated time reaches the drop interval
//! (1000ms at level 1, 80ms less per level, never below 120ms) the active piece
//! falls one row, or locks if it cannot.

pub mod board;
pub mod collision;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

pub use board::{Board, ClearedRows};
pub use collision::collides;
pub use game_state::GameState;
pub use pieces::{base_shape, spawn_x, try_spin, Shape, Tetromino};
pub use rng::PieceFactory;
pub use scoring::{calculate_line_score, calculate_score, get_drop_interval_ms, ScoreResult};
pub use snapshot::{GameSnapshot, PieceSnapshot};
