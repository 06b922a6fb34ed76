//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no I/O, so they can be shared by the engine,
//! the terminal front end, and the event journal alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn row**: -1 (one row above the visible grid)
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 16 | Default frame cadence of the shell (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Drop interval at level 1 |
//! | `DROP_INTERVAL_STEP_MS` | 80 | Interval reduction per level |
//! | `DROP_INTERVAL_FLOOR_MS` | 120 | Fastest possible drop interval |
//!
//! # Drop Intervals by Level
//!
//! `max(120, 1000 - (level - 1) * 80)`:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1000ms |
//! | 2 | 920ms |
//! | 5 | 680ms |
//! | 10 | 280ms |
//! | 12+ | 120ms |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! // Board grids store kinds as compact tags; 0 is an empty cell.
//! assert_eq!(PieceKind::from_tag(PieceKind::T.tag()), Some(PieceKind::T));
//! assert_eq!(PieceKind::from_tag(0), None);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Default frame interval of the front-end loop in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Drop interval at the starting level (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Drop interval reduction per level gained
pub const DROP_INTERVAL_STEP_MS: u32 = 80;

/// Minimum drop interval floor (120ms)
pub const DROP_INTERVAL_FLOOR_MS: u32 = 120;

/// Level a fresh session starts at
pub const START_LEVEL: u32 = 1;

/// Lines needed per level: the level rises once `lines >= level * LINES_PER_LEVEL`
pub const LINES_PER_LEVEL: u32 = 10;

/// Row a freshly spawned piece's bounding box starts at
pub const SPAWN_Y: i8 = -1;

/// Horizontal offsets tried, in order, when a rotation does not fit in place
pub const KICK_OFFSETS: [i8; 5] = [0, -1, 1, -2, 2];

/// Line clear scoring table
///
/// Base points for clearing N lines, multiplied by the current level:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Every kind, in draw-table order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Compact non-zero tag used by `u8` board grids (1..=7, 0 means empty).
    pub fn tag(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;

/// Lifecycle phase of a session.
///
/// Exactly one phase holds at a time:
/// `Idle -> Running <-> Paused`, `Running -> GameOver`, and `start` moves any
/// phase back to `Running` (or straight to `GameOver` if the first spawn is blocked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SessionPhase {
    /// Before the first start
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Game actions that can be applied to a session
///
/// Every action is defined in every phase; actions that do not apply are
/// ignored rather than reported as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one row down, locking it if it cannot move
    SoftDrop,
    /// Drop piece to the lowest legal row and lock it
    HardDrop,
    /// Rotate piece 90° clockwise with horizontal kicks
    Rotate,
    /// Toggle between running and paused
    Pause,
    /// Start a new session (also restarts after game over)
    Start,
}

/// Event emitted after a piece locks.
///
/// Consumed by observers such as the event journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Points awarded by this lock (0 when no line was cleared).
    pub points: u32,
    /// Level after the lock.
    pub level: u32,
    pub level_up: bool,
    /// Total score after the lock.
    pub score: u32,
}
