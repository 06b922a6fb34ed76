//! Terminal runner (default binary).
//!
//! crossterm for input and a framebuffer-based renderer. Configuration comes
//! from `BLOCKFALL_*` environment variables (see `blockfall::config`).

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use blockfall::core::{GameSnapshot, GameState};
use blockfall::input::{handle_key_event, is_key_down, should_quit};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::{EventJournal, GameConfig, JournalEvent};

fn main() -> Result<()> {
    let config = GameConfig::from_env();

    // Open before raw mode so a bad path is reported on a normal terminal.
    let journal = match config.log_path.as_deref() {
        Some(path) => EventJournal::open(path)?,
        None => EventJournal::disabled(),
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config, journal);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, config: &GameConfig, mut journal: EventJournal) -> Result<()> {
    let mut game = GameState::new(config.seed);
    let view = GameView::new(config.cell_width, 1);

    let frame = Duration::from_millis(config.frame_ms as u64);
    let mut last_frame = Instant::now();

    let mut fb = FrameBuffer::new(0, 0);
    let mut prev = GameSnapshot::default();
    let mut snap = GameSnapshot::default();

    loop {
        game.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until the next frame.
        let timeout = frame.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if is_key_down(&key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        game.apply_action(action);
                        journal_lock(&mut game, &mut journal);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // The baseline advances every frame, paused or not, and a paused
        // tick is a no-op, so paused time never reaches gravity.
        let elapsed = last_frame.elapsed();
        if elapsed >= frame {
            last_frame = Instant::now();
            game.tick(elapsed.as_millis().min(u32::MAX as u128) as u32);
            journal_lock(&mut game, &mut journal);
        }

        game.snapshot_into(&mut snap);
        journal.record_all(JournalEvent::from_transition(&prev, &snap, config.seed));
        prev = snap;
    }
}

fn journal_lock(game: &mut GameState, journal: &mut EventJournal) {
    if let Some(ev) = game.take_last_event() {
        journal.record_all(JournalEvent::from_lock(
            game.episode_id(),
            &ev,
            game.drop_interval_ms(),
        ));
    }
}
