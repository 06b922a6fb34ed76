//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, PieceSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, SessionPhase, BOARD_HEIGHT, BOARD_WIDTH};

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// Width of the next-piece box, in board cells.
const PREVIEW_CELLS: u16 = 4;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Screen-space geometry of the bordered play field.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse one framebuffer across frames; it is only resized
    /// when the viewport changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;
        let frame = Frame {
            x: viewport.width.saturating_sub(frame_w + self.panel_width()) / 2,
            y: viewport.height.saturating_sub(frame_h) / 2,
            w: frame_w,
            h: frame_h,
        };

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            board_px_w,
            board_px_h,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), PLAY_BG),
        );
        draw_border(
            fb,
            frame,
            CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG),
        );

        // Locked cells.
        for y in 0..BOARD_HEIGHT as u16 {
            for x in 0..BOARD_WIDTH as u16 {
                match PieceKind::from_tag(snap.board[y as usize][x as usize]) {
                    Some(kind) => self.draw_board_cell(fb, frame, x, y, kind),
                    None => self.draw_empty_cell(fb, frame, x, y),
                }
            }
        }

        // Active piece; rows above the grid stay hidden.
        if let Some(active) = snap.active {
            for (x, y) in active.cells() {
                if (0..BOARD_WIDTH as i16).contains(&x) && (0..BOARD_HEIGHT as i16).contains(&y) {
                    self.draw_board_cell(fb, frame, x as u16, y as u16, active.kind);
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        match snap.phase {
            SessionPhase::Idle => {
                draw_overlay(fb, frame, &["BLOCKFALL", "", "ENTER to start"]);
            }
            SessionPhase::Paused => {
                draw_overlay(fb, frame, &["PAUSED", "", "P to resume"]);
            }
            SessionPhase::GameOver => {
                draw_overlay(fb, frame, &["GAME OVER", "", "R to restart"]);
            }
            SessionPhase::Running => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn panel_width(&self) -> u16 {
        2 + (PREVIEW_CELLS * self.cell_w).max(12)
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
        self.fill_cell_rect(fb, frame.x + 1, frame.y + 1, x, y, '·', style);
    }

    fn draw_board_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, kind: PieceKind) {
        let style = CellStyle::new(piece_color(kind), PLAY_BG).bold();
        self.fill_cell_rect(fb, frame.x + 1, frame.y + 1, x, y, '█', style);
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        origin_x: u16,
        origin_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = origin_x + cell_x * self.cell_w;
        let py = origin_y + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = frame.y;
        for (name, n) in [("SCORE", snap.score), ("LINES", snap.lines), ("LEVEL", snap.level)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "SPEED", label);
        fb.put_str(panel_x, y + 1, &snap.speed_label(), value);
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = snap.next {
            self.draw_preview(fb, panel_x, y, &next);
        }
        y = y.saturating_add(3 * self.cell_h);

        if y.saturating_add(6) <= frame.y.saturating_add(frame.h) {
            let help = value.dim();
            for line in ["←→ move", "↑  rotate", "↓  soft drop", "␣  hard drop", "P  pause", "Q  quit"] {
                fb.put_str(panel_x, y, line, help);
                y = y.saturating_add(1);
            }
        }
    }

    /// Draw `piece` centered in a box `PREVIEW_CELLS` wide and two cells tall.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, piece: &PieceSnapshot) {
        let cols = piece.shape.cols() as u16;
        let rows = piece.shape.rows() as u16;
        // A vertical preview would only happen for a rotated look-ahead piece.
        let off_x = PREVIEW_CELLS.saturating_sub(cols) * self.cell_w / 2;
        let off_y = 2u16.saturating_sub(rows) * self.cell_h / 2;

        let style = CellStyle::new(piece_color(piece.kind), SCREEN_BG).bold();
        for (dx, dy) in piece.shape.minos() {
            self.fill_cell_rect(fb, x + off_x, y + off_y, dx as u16, dy as u16, '█', style);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Centered lines over the middle of the play field; the first is the title.
fn draw_overlay(fb: &mut FrameBuffer, frame: Frame, lines: &[&str]) {
    let title = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
    let body = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

    let top = frame
        .y
        .saturating_add(frame.h / 2)
        .saturating_sub(lines.len() as u16 / 2);
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let style = if i == 0 { title } else { body };
        fb.put_str_centered(frame.x, frame.w, top + i as u16, line, style);
    }
}

fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(96, 165, 250),
        PieceKind::J => Rgb::new(192, 132, 252),
        PieceKind::L => Rgb::new(52, 211, 153),
        PieceKind::O => Rgb::new(245, 158, 11),
        PieceKind::S => Rgb::new(34, 211, 238),
        PieceKind::T => Rgb::new(244, 114, 182),
        PieceKind::Z => Rgb::new(251, 113, 133),
    }
}
