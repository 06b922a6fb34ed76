//! Terminal rendering for the game.
//!
//! A small, game-oriented rendering layer: a [`GameView`] paints a
//! [`core::GameSnapshot`](crate::core::GameSnapshot) into a [`FrameBuffer`],
//! and a [`TerminalRenderer`] flushes only the cells that changed since the
//! previous frame.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
