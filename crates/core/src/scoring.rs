//! Scoring module - classic line-clear points and level progression
//!
//! - Clearing `c` rows awards `LINE_SCORES[c] * level` (level starts at 1).
//! - The level rises by one once total lines reach `level * 10`, at most once
//!   per lock.
//! - The drop interval shrinks by 80ms per level down to a 120ms floor.
//! - Drops award no points.

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_FLOOR_MS, DROP_INTERVAL_STEP_MS, LINES_PER_LEVEL, LINE_SCORES,
};

/// Result of scoring one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points awarded for this lock
    pub points: u32,
    /// Total lines after the lock
    pub lines: u32,
    /// Level after the lock
    pub level: u32,
    pub level_up: bool,
}

/// Calculate line clear score
/// lines: number of lines cleared (values above 4 score as 4)
/// level: current level (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    LINE_SCORES[lines.min(4)].saturating_mul(level)
}

/// Drop interval for a level: `max(120, 1000 - (level - 1) * 80)`.
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(DROP_INTERVAL_STEP_MS);
    BASE_DROP_MS
        .saturating_sub(reduction)
        .max(DROP_INTERVAL_FLOOR_MS)
}

/// Level after reaching `total_lines`: one above `level` once the threshold
/// `level * 10` is reached, otherwise unchanged.
pub fn next_level(total_lines: u32, level: u32) -> u32 {
    if total_lines >= level.saturating_mul(LINES_PER_LEVEL) {
        level.saturating_add(1)
    } else {
        level
    }
}

/// Score a lock that cleared `lines_cleared` rows.
///
/// A lock that clears nothing leaves lines and level untouched.
pub fn calculate_score(lines_cleared: usize, level: u32, total_lines: u32) -> ScoreResult {
    if lines_cleared == 0 {
        return ScoreResult {
            points: 0,
            lines: total_lines,
            level,
            level_up: false,
        };
    }

    let points = calculate_line_score(lines_cleared, level);
    let lines = total_lines.saturating_add(lines_cleared as u32);
    let new_level = next_level(lines, level);

    ScoreResult {
        points,
        lines,
        level: new_level,
        level_up: new_level != level,
    }
}

/// Gravity speed relative to the starting level, as shown in the HUD.
pub fn speed_factor(drop_interval_ms: u32) -> f32 {
    BASE_DROP_MS as f32 / drop_interval_ms.max(1) as f32
}
