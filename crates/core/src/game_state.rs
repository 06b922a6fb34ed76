//! Game state module - the session controller
//!
//! This module ties together the board, pieces, collision, the piece factory
//! and scoring. It owns the session phase and the drop timer, and it drives
//! the spawn -> fall -> lock -> clear -> respawn cycle.
//!
//! Every operation is defined in every phase. Illegal moves and rotations are
//! silent no-ops that return `false`; a blocked spawn is the only way a
//! session ends.

use rand::rngs::StdRng;
use rand::Rng;

use crate::board::Board;
use crate::collision::collides;
use crate::pieces::{spawn_x, try_spin, Tetromino};
use crate::rng::PieceFactory;
use crate::scoring::{calculate_score, get_drop_interval_ms};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::*;

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState<R = StdRng> {
    board: Board,
    active: Option<Tetromino>,
    next: Option<Tetromino>,
    factory: PieceFactory<R>,
    phase: SessionPhase,
    /// Incremented on every `start`.
    episode_id: u32,
    /// Incremented on every successful spawn within the episode.
    pieces_spawned: u32,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
    score: u32,
    level: u32,
    lines: u32,
    drop_interval_ms: u32,
    drop_timer_ms: u32,
}

impl GameState<StdRng> {
    /// Create a new idle session with the given RNG seed
    pub fn new(seed: u64) -> Self {
        Self::with_factory(PieceFactory::new(seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Create a new idle session drawing pieces from `factory`.
    pub fn with_factory(factory: PieceFactory<R>) -> Self {
        Self {
            board: Board::new(),
            active: None,
            next: None,
            factory,
            phase: SessionPhase::Idle,
            episode_id: 0,
            pieces_spawned: 0,
            last_event: None,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            drop_interval_ms: get_drop_interval_ms(START_LEVEL),
            drop_timer_ms: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn paused(&self) -> bool {
        self.phase == SessionPhase::Paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    /// Time accumulated toward the next forced drop.
    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn next_piece(&self) -> Option<Tetromino> {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for scenario setup (tests, puzzles).
    ///
    /// Writes made here bypass the lock path, so no scoring happens for them.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = self.active.map(PieceSnapshot::from);
        out.next = self.next.map(PieceSnapshot::from);
        out.phase = self.phase;
        out.episode_id = self.episode_id;
        out.pieces_spawned = self.pieces_spawned;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.drop_interval_ms = self.drop_interval_ms;
        out.drop_timer_ms = self.drop_timer_ms;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Start (or restart) a session.
    ///
    /// Resets the board, score, lines, level, drop interval and timer, draws a
    /// fresh look-ahead piece and spawns. If that first spawn is already
    /// blocked the session goes straight to `GameOver`.
    pub fn start(&mut self) {
        self.board.clear();
        self.active = None;
        self.last_event = None;
        self.score = 0;
        self.lines = 0;
        self.level = START_LEVEL;
        self.drop_interval_ms = get_drop_interval_ms(START_LEVEL);
        self.drop_timer_ms = 0;
        self.pieces_spawned = 0;
        self.episode_id = self.episode_id.wrapping_add(1);

        self.next = Some(self.factory.draw());
        self.phase = SessionPhase::Running;
        self.spawn_piece();
    }

    /// Promote the look-ahead piece to the active piece and draw a new one.
    ///
    /// The piece is centered horizontally at row -1. If it collides there the
    /// session ends and the piece is not installed. No-op unless running.
    pub fn spawn_piece(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }

        let mut piece = match self.next.take() {
            Some(piece) => piece,
            None => self.factory.draw(),
        };
        self.next = Some(self.factory.draw());

        piece.x = spawn_x(&piece.shape);
        piece.y = SPAWN_Y;

        if piece.collides(&self.board) {
            self.active = None;
            self.phase = SessionPhase::GameOver;
            return false;
        }

        self.active = Some(piece);
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        true
    }

    /// Shift the active piece if the target position is free.
    fn shift(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let (Some(x), Some(y)) = (active.x.checked_add(dx), active.y.checked_add(dy)) else {
            return false;
        };

        if collides(&self.board, &active.shape, x, y) {
            return false;
        }

        self.active = Some(Tetromino { x, y, ..active });
        true
    }

    /// Try to move the active piece horizontally by `dx` columns
    pub fn try_move(&mut self, dx: i8) -> bool {
        if !self.running() {
            return false;
        }
        self.shift(dx, 0)
    }

    /// Rotate the active piece clockwise, kicking up to two columns sideways.
    ///
    /// Shape and position change together or not at all.
    pub fn try_spin(&mut self) -> bool {
        if !self.running() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match try_spin(&self.board, &active.shape, active.x, active.y) {
            Some((shape, kick)) => {
                self.active = Some(Tetromino {
                    shape,
                    x: active.x + kick,
                    ..active
                });
                true
            }
            None => false,
        }
    }

    /// Move the active piece down one row, locking it if it cannot move.
    ///
    /// Returns `true` if the piece moved, `false` if it locked (or nothing
    /// happened because the session is not running).
    pub fn soft_drop(&mut self) -> bool {
        if !self.running() || self.active.is_none() {
            return false;
        }
        if self.shift(0, 1) {
            return true;
        }
        self.lock_piece();
        false
    }

    /// Drop the active piece to the lowest legal row and lock it.
    ///
    /// Returns the number of rows fallen. Drops award no points.
    pub fn hard_drop(&mut self) -> u32 {
        if !self.running() || self.active.is_none() {
            return 0;
        }

        let mut distance: u32 = 0;
        while self.shift(0, 1) {
            distance += 1;
        }

        self.lock_piece();
        distance
    }

    /// Merge the active piece into the board, clear rows, score, and respawn.
    pub fn lock_piece(&mut self) {
        if !self.running() {
            return;
        }
        let Some(active) = self.active.take() else {
            return;
        };

        self.board
            .place_piece(&active.shape, active.x, active.y, active.kind);

        let cleared_rows = self.board.clear_full_rows();
        let result = calculate_score(cleared_rows.len(), self.level, self.lines);

        if !cleared_rows.is_empty() {
            self.score = self.score.saturating_add(result.points);
            self.lines = result.lines;
            if result.level_up {
                self.level = result.level;
                self.drop_interval_ms = get_drop_interval_ms(self.level);
            }
        }

        self.last_event = Some(LockEvent {
            lines_cleared: cleared_rows.len() as u32,
            points: result.points,
            level: self.level,
            level_up: result.level_up,
            score: self.score,
        });

        self.spawn_piece();
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Advance the drop timer by `elapsed_ms`.
    ///
    /// Once the accumulated time reaches the drop interval the timer resets
    /// and the piece takes one soft-drop step. Returns `true` when that step
    /// happened. No-op unless running.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.running() {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms < self.drop_interval_ms {
            return false;
        }

        self.drop_timer_ms = 0;
        self.soft_drop();
        true
    }

    /// Running -> Paused
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.phase = SessionPhase::Paused;
        true
    }

    /// Paused -> Running
    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Running;
        true
    }

    /// Flip between Running and Paused; no-op in other phases.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            SessionPhase::Running => self.pause(),
            SessionPhase::Paused => self.resume(),
            SessionPhase::Idle | SessionPhase::GameOver => false,
        }
    }

    /// Apply a game action, returning whether it changed anything.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.try_move(-1),
            GameAction::MoveRight => self.try_move(1),
            GameAction::SoftDrop => {
                if !self.running() {
                    return false;
                }
                self.soft_drop();
                true
            }
            GameAction::HardDrop => {
                if !self.running() || self.active.is_none() {
                    return false;
                }
                self.hard_drop();
                true
            }
            GameAction::Rotate => self.try_spin(),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Start => {
                self.start();
                true
            }
        }
    }
}

impl Default for GameState<StdRng> {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::base_shape;
    use rand::rngs::mock::StepRng;

    /// Session whose factory only ever yields I pieces.
    fn i_only() -> GameState<StepRng> {
        GameState::with_factory(PieceFactory::from_rng(StepRng::new(0, 0)))
    }

    fn fill_row_except(state: &mut GameState<StepRng>, y: i8, skip: std::ops::Range<i8>) {
        for x in 0..BOARD_WIDTH as i8 {
            if !skip.contains(&x) {
                state.board.set(x, y, Some(PieceKind::Z));
            }
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines, 0);
        assert_eq!(state.drop_interval_ms, 1000);
        assert_eq!(state.episode_id, 0);
        assert!(state.active.is_none());
        assert!(state.next.is_none());
    }

    #[test]
    fn test_game_start() {
        let mut state = GameState::new(12345);
        state.start();

        assert_eq!(state.phase, SessionPhase::Running);
        assert_eq!(state.episode_id, 1);
        assert_eq!(state.pieces_spawned, 1);
        assert!(state.active.is_some());
        assert!(state.next.is_some());
    }

    #[test]
    fn test_spawn_position() {
        let mut state = GameState::new(12345);
        state.start();

        let active = state.active.unwrap();
        assert_eq!(active.y, -1);
        assert_eq!(active.x, 5 - (active.width() / 2) as i8);
        assert_eq!(active.shape, base_shape(active.kind));
    }

    #[test]
    fn test_spawn_promotes_next_piece() {
        let mut state = GameState::new(12345);
        state.start();

        let next_kind = state.next.unwrap().kind;
        state.hard_drop();

        assert!(state.running());
        assert_eq!(state.active.unwrap().kind, next_kind);
        assert_eq!(state.pieces_spawned, 2);
    }

    #[test]
    fn test_blocked_spawn_ends_session() {
        let mut state = GameState::new(12345);
        state.start();
        // Every two-row piece overlaps row 0 at spawn; a flat I hangs above it.
        for x in 1..BOARD_WIDTH as i8 {
            state.board.set(x, 0, Some(PieceKind::Z));
        }

        let mut spawns = 0;
        while state.spawn_piece() {
            spawns += 1;
            assert!(spawns < 100, "factory never produced a blocking piece");
        }

        assert!(state.game_over());
        assert!(state.active.is_none());
        assert!(state.next.is_some());
        assert!(!state.try_move(1));
        assert!(!state.tick(5_000));
    }

    #[test]
    fn test_actions_ignored_when_idle() {
        let mut state = GameState::new(12345);

        assert!(!state.try_move(1));
        assert!(!state.try_spin());
        assert!(!state.soft_drop());
        assert_eq!(state.hard_drop(), 0);
        assert!(!state.tick(5_000));
        assert!(!state.pause());
        assert!(!state.resume());
        assert!(!state.toggle_pause());
        assert_eq!(state.phase, SessionPhase::Idle);
    }

    #[test]
    fn test_try_move() {
        let mut state = i_only();
        state.start();
        let initial_x = state.active.unwrap().x;

        assert!(state.try_move(1));
        assert_eq!(state.active.unwrap().x, initial_x + 1);
        assert!(state.try_move(-1));
        assert_eq!(state.active.unwrap().x, initial_x);
    }

    #[test]
    fn test_try_move_rejected_at_wall() {
        let mut state = i_only();
        state.start();

        // I spawns at x = 3; three steps reach the wall.
        let moved = (0..10).filter(|_| state.try_move(-1)).count();
        assert_eq!(moved, 3);
        assert_eq!(state.active.unwrap().x, 0);

        assert!(!state.try_move(-1));
        assert_eq!(state.active.unwrap().x, 0);
    }

    #[test]
    fn test_try_spin_at_spawn() {
        let mut state = i_only();
        state.start();

        // Standing up at row -1 covers rows -1..=2, all free.
        assert!(state.try_spin());
        let active = state.active.unwrap();
        assert_eq!((active.shape.rows(), active.shape.cols()), (4, 1));
        assert_eq!((active.x, active.y), (3, -1));
    }

    #[test]
    fn test_try_spin_blocked_is_noop() {
        let mut state = i_only();
        state.start();
        let before = state.active;

        // A vertical bar would cross row 1 in every column.
        for x in 0..BOARD_WIDTH as i8 {
            state.board.set(x, 1, Some(PieceKind::Z));
        }

        assert!(!state.try_spin());
        assert_eq!(state.active, before);
    }

    #[test]
    fn test_soft_drop_moves_then_locks() {
        let mut state = i_only();
        state.start();

        let mut moves = 0;
        while state.soft_drop() {
            moves += 1;
        }
        // From row -1 down to row 19.
        assert_eq!(moves, 20);
        assert_eq!(state.board.filled_count(), 4);
        assert_eq!(state.pieces_spawned, 2);
    }

    #[test]
    fn test_hard_drop_awards_no_points() {
        let mut state = i_only();
        state.start();

        assert_eq!(state.hard_drop(), 20);
        assert_eq!(state.score, 0);
        assert!((3..7).all(|x| state.board.is_occupied(x, 19)));

        let ev = state.take_last_event().unwrap();
        assert_eq!(ev.lines_cleared, 0);
        assert_eq!(ev.points, 0);
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn test_lock_clears_line_and_scores() {
        let mut state = i_only();
        state.start();
        fill_row_except(&mut state, 19, 3..7);

        state.hard_drop();

        assert_eq!(state.lines, 1);
        assert_eq!(state.score, 40);
        assert_eq!(state.level, 1);
        assert_eq!(state.board.filled_count(), 0);
    }

    #[test]
    fn test_tetris_scores_1200_times_level() {
        let mut state = i_only();
        state.start();
        state.level = 3;
        for y in 16..20 {
            fill_row_except(&mut state, y, 0..1);
        }
        assert!(state.try_spin());
        while state.try_move(-1) {}

        state.hard_drop();

        assert_eq!(state.lines, 4);
        assert_eq!(state.score, 3600);
    }

    #[test]
    fn test_double_scores_100_times_level() {
        let mut state = i_only();
        state.start();
        state.level = 2;
        for y in 18..20 {
            fill_row_except(&mut state, y, 0..1);
        }
        assert!(state.try_spin());
        while state.try_move(-1) {}

        state.hard_drop();

        assert_eq!(state.lines, 2);
        assert_eq!(state.score, 200);
        assert_eq!(state.level, 2);
        let ev = state.take_last_event().unwrap();
        assert_eq!(ev.lines_cleared, 2);
        assert_eq!(ev.points, 200);
        assert!(!ev.level_up);
        // Two of the four I cells remain above the cleared rows.
        assert_eq!(state.board.get(0, 19), Some(Some(PieceKind::I)));
        assert_eq!(state.board.get(0, 18), Some(Some(PieceKind::I)));
        assert_eq!(state.board.get(0, 17), Some(None));
    }

    #[test]
    fn test_level_up_updates_drop_interval() {
        let mut state = i_only();
        state.start();
        state.lines = 9;
        fill_row_except(&mut state, 19, 3..7);

        state.hard_drop();

        assert_eq!(state.lines, 10);
        assert_eq!(state.level, 2);
        assert_eq!(state.drop_interval_ms, 920);
        let ev = state.take_last_event().unwrap();
        assert!(ev.level_up);
        assert_eq!(ev.level, 2);
    }

    #[test]
    fn test_tick_gravity() {
        let mut state = i_only();
        state.start();
        let initial_y = state.active.unwrap().y;

        assert!(!state.tick(999));
        assert_eq!(state.active.unwrap().y, initial_y);
        assert_eq!(state.drop_timer_ms, 999);

        assert!(state.tick(1));
        assert_eq!(state.active.unwrap().y, initial_y + 1);
        assert_eq!(state.drop_timer_ms, 0);
    }

    #[test]
    fn test_tick_single_step_per_call() {
        let mut state = i_only();
        state.start();
        let initial_y = state.active.unwrap().y;

        // A large delta still advances one row and resets the accumulator.
        assert!(state.tick(10_000));
        assert_eq!(state.active.unwrap().y, initial_y + 1);
        assert_eq!(state.drop_timer_ms, 0);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = i_only();
        state.start();
        let before = state.active;

        assert!(state.pause());
        assert!(state.paused());
        assert!(!state.tick(5_000));
        assert!(!state.try_move(1));
        assert!(!state.try_spin());
        assert_eq!(state.hard_drop(), 0);
        assert_eq!(state.active, before);

        assert!(state.toggle_pause());
        assert!(state.running());
    }

    #[test]
    fn test_paused_time_does_not_carry_into_resume() {
        let mut state = i_only();
        state.start();
        let initial_y = state.active.unwrap().y;

        assert!(!state.tick(600));
        assert!(state.pause());
        assert!(!state.tick(60_000));
        assert!(state.resume());
        assert_eq!(state.drop_timer_ms, 600);

        // Only the running time before the pause counts toward the step.
        assert!(!state.tick(399));
        assert_eq!(state.active.unwrap().y, initial_y);
        assert!(state.tick(1));
        assert_eq!(state.active.unwrap().y, initial_y + 1);
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut state = i_only();
        state.start();
        fill_row_except(&mut state, 19, 3..7);
        state.hard_drop();
        assert_eq!(state.score, 40);

        assert!(state.apply_action(GameAction::Start));
        assert_eq!(state.episode_id, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.lines, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.board.filled_count(), 0);
        assert!(state.running());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = i_only();
        state.start();
        state.hard_drop();

        let snap = state.snapshot();
        assert_eq!(snap.phase, SessionPhase::Running);
        assert_eq!(snap.board[19][3], PieceKind::I.tag());
        assert_eq!(snap.active.unwrap().kind, PieceKind::I);
        assert_eq!(snap.next.unwrap().kind, PieceKind::I);
        assert_eq!(snap.pieces_spawned, 2);
    }
}
