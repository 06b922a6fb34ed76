//! Pieces module - tetromino shapes, the rotation transform and kick search
//!
//! A piece's shape *is* its rotation state: rotating replaces the matrix with
//! its clockwise transform, and the bounding box changes with it (the 1x4 bar
//! becomes 4x1). There is no separate orientation tracking.

use crate::board::Board;
use crate::collision::collides;
use crate::types::{PieceKind, BOARD_WIDTH, KICK_OFFSETS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest bounding-box side of any shape.
pub const MAX_SHAPE_DIM: usize = 4;

/// Offset of a single mino relative to the bounding box origin, as (dx, dy).
pub type MinoOffset = (i8, i8);

/// Rectangular boolean matrix of a piece (`rows x cols`, at most 4x4).
///
/// Storage beyond `rows x cols` is always `false`, so two shapes compare equal
/// exactly when their dimensions and occupied cells match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_SHAPE_DIM]; MAX_SHAPE_DIM],
}

impl Shape {
    /// Build a shape from rows of 0/1 values.
    pub const fn from_rows<const R: usize, const C: usize>(rows: [[u8; C]; R]) -> Self {
        assert!(R >= 1 && R <= MAX_SHAPE_DIM && C >= 1 && C <= MAX_SHAPE_DIM);

        let mut cells = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        let mut y = 0;
        while y < R {
            let mut x = 0;
            while x < C {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }

        Self {
            rows: R as u8,
            cols: C as u8,
            cells,
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Occupied cells as (dx, dy) offsets, row by row.
    pub fn minos(&self) -> impl Iterator<Item = MinoOffset> {
        let shape = *self;
        (0..shape.rows as usize).flat_map(move |y| {
            (0..shape.cols as usize)
                .filter(move |&x| shape.cells[y][x])
                .map(move |x| (x as i8, y as i8))
        })
    }

    /// Clockwise quarter turn: an `N x M` matrix becomes `M x N` with
    /// `out[x][N - 1 - y] = in[y][x]`.
    pub fn rotated_cw(&self) -> Self {
        let n = self.rows as usize;
        let m = self.cols as usize;
        let mut cells = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];

        for (y, row) in self.cells.iter().enumerate().take(n) {
            for (x, &filled) in row.iter().enumerate().take(m) {
                if filled {
                    cells[x][n - 1 - y] = true;
                }
            }
        }

        Self {
            rows: m as u8,
            cols: n as u8,
            cells,
        }
    }
}

const I_SHAPE: Shape = Shape::from_rows([[1, 1, 1, 1]]);
const J_SHAPE: Shape = Shape::from_rows([[1, 0, 0], [1, 1, 1]]);
const L_SHAPE: Shape = Shape::from_rows([[0, 0, 1], [1, 1, 1]]);
const O_SHAPE: Shape = Shape::from_rows([[1, 1], [1, 1]]);
const S_SHAPE: Shape = Shape::from_rows([[0, 1, 1], [1, 1, 0]]);
const T_SHAPE: Shape = Shape::from_rows([[0, 1, 0], [1, 1, 1]]);
const Z_SHAPE: Shape = Shape::from_rows([[1, 1, 0], [0, 1, 1]]);

/// Default orientation of a piece kind.
///
/// Returned by value: callers rotate their own copy, never the table.
pub fn base_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::Z => Z_SHAPE,
    }
}

/// Column that horizontally centers a shape on the board.
pub fn spawn_x(shape: &Shape) -> i8 {
    (BOARD_WIDTH / 2) as i8 - (shape.cols() / 2) as i8
}

/// A piece instance: kind, current shape and bounding-box origin.
///
/// `y` may be negative while the piece is still partly above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Fresh piece with the kind's base shape at (0, 0); the caller positions it.
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: base_shape(kind),
            x: 0,
            y: 0,
        }
    }

    /// Bounding-box width in columns.
    pub fn width(&self) -> u8 {
        self.shape.cols()
    }

    /// Whether the piece overlaps a wall, the floor or a locked cell.
    pub fn collides(&self, board: &Board) -> bool {
        collides(board, &self.shape, self.x, self.y)
    }
}

/// Try to rotate a shape clockwise at (`x`, `y`), kicking horizontally.
///
/// Offsets from [`KICK_OFFSETS`] are tried in order against the same row; the
/// first placement that does not collide wins. Returns the rotated shape and
/// the kick that was applied, or `None` when every candidate collides.
pub fn try_spin(board: &Board, shape: &Shape, x: i8, y: i8) -> Option<(Shape, i8)> {
    let rotated = shape.rotated_cw();

    KICK_OFFSETS.iter().copied().find_map(|kick| {
        let nx = x.checked_add(kick)?;
        if collides(board, &rotated, nx, y) {
            None
        } else {
            Some((rotated, kick))
        }
    })
}
