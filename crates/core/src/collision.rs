//! Collision check for a shape placed on the board.
//!
//! Walls and the floor are strict. The ceiling is open: cells with a negative
//! row are never tested against the board, so a piece may hang partly above
//! the grid (which is how pieces spawn at row -1).

use crate::board::Board;
use crate::pieces::Shape;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Does `shape` with its bounding box at (`x`, `y`) hit a wall, the floor or a
/// locked cell?
pub fn collides(board: &Board, shape: &Shape, x: i8, y: i8) -> bool {
    shape.minos().any(|(dx, dy)| {
        let nx = x as i16 + dx as i16;
        let ny = y as i16 + dy as i16;

        if nx < 0 || nx >= BOARD_WIDTH as i16 || ny >= BOARD_HEIGHT as i16 {
            return true;
        }

        ny >= 0 && board.is_occupied(nx as i8, ny as i8)
    })
}
