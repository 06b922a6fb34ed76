//! Read-only view of a session for renderers and observers.

use crate::pieces::{Shape, Tetromino};
use crate::scoring::speed_factor;
use crate::types::{PieceKind, SessionPhase, BASE_DROP_MS, BOARD_HEIGHT, BOARD_WIDTH, START_LEVEL};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl PieceSnapshot {
    /// Absolute board coordinates of every mino (may include negative rows).
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> {
        let (x, y) = (self.x as i16, self.y as i16);
        self.shape
            .minos()
            .map(move |(dx, dy)| (x + dx as i16, y + dy as i16))
    }
}

impl From<Tetromino> for PieceSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameSnapshot {
    /// Locked cells as tags (0 = empty, see `PieceKind::tag`).
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<PieceSnapshot>,
    pub next: Option<PieceSnapshot>,
    pub phase: SessionPhase,
    pub episode_id: u32,
    pub pieces_spawned: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_interval_ms: u32,
    pub drop_timer_ms: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = None;
        self.next = None;
        self.phase = SessionPhase::Idle;
        self.episode_id = 0;
        self.pieces_spawned = 0;
        self.score = 0;
        self.level = START_LEVEL;
        self.lines = 0;
        self.drop_interval_ms = BASE_DROP_MS;
        self.drop_timer_ms = 0;
    }

    /// HUD speed value, e.g. `1.0x` at level 1.
    pub fn speed_label(&self) -> String {
        format!("{:.1}x", speed_factor(self.drop_interval_ms))
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            next: None,
            phase: SessionPhase::Idle,
            episode_id: 0,
            pieces_spawned: 0,
            score: 0,
            level: 0,
            lines: 0,
            drop_interval_ms: 0,
            drop_timer_ms: 0,
        };
        s.clear();
        s
    }
}
