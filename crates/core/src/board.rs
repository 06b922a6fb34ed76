//! Board module - the grid of locked cells
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! The board knows nothing about walls or falling pieces: bounds checks for
//! movement live in [`crate::collision`].

use arrayvec::ArrayVec;

use crate::pieces::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const ROWS: usize = BOARD_HEIGHT as usize;

/// Row indices removed by a single clear pass, in pre-clear coordinates.
pub type ClearedRows = ArrayVec<usize, ROWS>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    ///
    /// Out-of-range writes are ignored and reported with `false`.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied.
    ///
    /// Coordinates outside the grid are never occupied; walls and floor are
    /// the collision check's concern.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= ROWS {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Remove row `y`, shift every row above it down by one and insert an
    /// empty row at the top.
    ///
    /// Returns the number of rows removed (1, or 0 when `y` is out of range).
    pub fn clear_row(&mut self, y: usize) -> usize {
        if y >= ROWS {
            return 0;
        }

        let width = BOARD_WIDTH as usize;

        // copy_within handles the overlapping ranges.
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            let dst_start = row * width;
            self.cells
                .copy_within(src_start..src_start + width, dst_start);
        }

        for cell in &mut self.cells[0..width] {
            *cell = None;
        }

        1
    }

    /// Remove every full row in a single bottom-to-top pass.
    ///
    /// When a row is removed the same index is examined again, since the row
    /// above has just moved into it. Returns the removed rows in pre-clear
    /// coordinates, bottom first.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut y = ROWS;

        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                // Every earlier removal shifted this row down by one.
                cleared.push(row - cleared.len());
                self.clear_row(row);
            } else {
                y -= 1;
            }
        }

        cleared
    }

    /// Write a piece's occupied cells into the board with the given tag.
    ///
    /// Cells above the grid (negative rows) and outside it are skipped.
    /// Returns the number of cells written.
    pub fn place_piece(&mut self, shape: &Shape, x: i8, y: i8, kind: PieceKind) -> usize {
        let mut written = 0;
        for (dx, dy) in shape.minos() {
            let px = x as i16 + dx as i16;
            let py = y as i16 + dy as i16;
            if py < 0 || px < 0 || px >= BOARD_WIDTH as i16 || py >= BOARD_HEIGHT as i16 {
                continue;
            }
            if self.set(px as i8, py as i8, Some(kind)) {
                written += 1;
            }
        }
        written
    }

    /// Number of occupied cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write the board as `u8` tags (0 = empty, see [`PieceKind::tag`]).
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; ROWS]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            let start = y * width;
            for (x, slot) in row.iter_mut().enumerate() {
                *slot = self.cells[start + x].map(|k| k.tag()).unwrap_or(0);
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Create from a 2D vector for testing (converts to flat array)
    #[cfg(test)]
    pub fn from_cells(cells_2d: Vec<Vec<Cell>>) -> Self {
        assert_eq!(cells_2d.len(), ROWS);
        assert!(cells_2d.iter().all(|row| row.len() == BOARD_WIDTH as usize));

        let mut flat = [None; BOARD_SIZE];
        for (y, row) in cells_2d.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                flat[y * BOARD_WIDTH as usize + x] = *cell;
            }
        }
        Self { cells: flat }
    }

    /// Convert to 2D vector for testing/display
    #[cfg(test)]
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        let width = BOARD_WIDTH as usize;
        (0..ROWS)
            .map(|y| {
                let start = y * width;
                self.cells[start..start + width].to_vec()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::base_shape;

    fn fill_row(board: &mut Board, y: i8, kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(kind));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_out_of_range_is_not_occupied() {
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT as i8 {
            fill_row(&mut board, y, PieceKind::Z);
        }
        assert!(!board.is_occupied(-1, 5));
        assert!(!board.is_occupied(10, 5));
        assert!(!board.is_occupied(3, -1));
        assert!(!board.is_occupied(3, 20));
        assert!(board.is_occupied(3, 19));
    }

    #[test]
    fn test_clear_row_shifts_rows_above_down() {
        let mut board = Board::new();
        board.set(0, 0, Some(PieceKind::I));
        board.set(1, 17, Some(PieceKind::T));
        fill_row(&mut board, 18, PieceKind::O);
        board.set(2, 19, Some(PieceKind::L));

        assert_eq!(board.clear_row(18), 1);

        assert_eq!(board.get(0, 1), Some(Some(PieceKind::I)));
        assert_eq!(board.get(1, 18), Some(Some(PieceKind::T)));
        // Rows below the cleared row are untouched.
        assert_eq!(board.get(2, 19), Some(Some(PieceKind::L)));
        // Fresh empty row at the top.
        assert!((0..10).all(|x| board.get(x, 0) == Some(None)));
        assert_eq!(board.clear_row(20), 0);
    }

    #[test]
    fn test_clear_full_rows_handles_adjacent_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 16, PieceKind::I);
        fill_row(&mut board, 17, PieceKind::I);
        board.set(4, 18, Some(PieceKind::S));
        fill_row(&mut board, 19, PieceKind::I);
        board.set(7, 15, Some(PieceKind::J));

        let cleared = board.clear_full_rows();

        assert_eq!(cleared.as_slice(), &[19, 17, 16]);
        assert_eq!(board.get(4, 19), Some(Some(PieceKind::S)));
        assert_eq!(board.get(7, 18), Some(Some(PieceKind::J)));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_clear_full_rows_keeps_partial_rows() {
        let mut board = Board::new();
        for x in 0..9 {
            board.set(x, 19, Some(PieceKind::T));
        }
        let before = board.clone();
        assert!(board.clear_full_rows().is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_piece_skips_rows_above_grid() {
        let mut board = Board::new();
        // T: 010 / 111 with its top row above the grid.
        let written = board.place_piece(&base_shape(PieceKind::T), 3, -1, PieceKind::T);
        assert_eq!(written, 3);
        assert!(board.is_occupied(3, 0));
        assert!(board.is_occupied(4, 0));
        assert!(board.is_occupied(5, 0));
    }

    #[test]
    fn test_write_u8_grid() {
        let mut board = Board::new();
        board.set(0, 0, Some(PieceKind::I));
        board.set(9, 19, Some(PieceKind::Z));

        let mut grid = [[0u8; 10]; 20];
        board.write_u8_grid(&mut grid);
        assert_eq!(grid[0][0], PieceKind::I.tag());
        assert_eq!(grid[19][9], PieceKind::Z.tag());
        assert_eq!(grid[10][5], 0);
    }

    #[test]
    fn test_board_from_cells_roundtrip() {
        let mut cells_2d = vec![vec![None; 10]; 20];
        cells_2d[5][3] = Some(PieceKind::O);
        cells_2d[10][7] = Some(PieceKind::L);

        let board = Board::from_cells(cells_2d.clone());
        assert_eq!(cells_2d, board.to_cells());
    }
}
