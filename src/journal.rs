//! Session event journal.
//!
//! One JSON object per line, appended to a file. The journal is best effort:
//! the first write failure disables it and the game carries on.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::GameSnapshot;
use crate::types::{LockEvent, SessionPhase};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEvent {
    Start {
        episode_id: u32,
        seed: u64,
    },
    Lock {
        episode_id: u32,
        lines_cleared: u32,
        points: u32,
        level: u32,
        score: u32,
    },
    LevelUp {
        episode_id: u32,
        level: u32,
        drop_interval_ms: u32,
    },
    Pause {
        episode_id: u32,
    },
    Resume {
        episode_id: u32,
    },
    GameOver {
        episode_id: u32,
        score: u32,
        lines: u32,
        level: u32,
        pieces_spawned: u32,
    },
}

impl JournalEvent {
    /// Events for one lock: always `lock`, plus `level_up` when the level rose.
    pub fn from_lock(episode_id: u32, ev: &LockEvent, drop_interval_ms: u32) -> Vec<JournalEvent> {
        let mut out = vec![JournalEvent::Lock {
            episode_id,
            lines_cleared: ev.lines_cleared,
            points: ev.points,
            level: ev.level,
            score: ev.score,
        }];
        if ev.level_up {
            out.push(JournalEvent::LevelUp {
                episode_id,
                level: ev.level,
                drop_interval_ms,
            });
        }
        out
    }

    /// Phase transitions between two consecutive snapshots.
    pub fn from_transition(prev: &GameSnapshot, cur: &GameSnapshot, seed: u64) -> Vec<JournalEvent> {
        let episode_id = cur.episode_id;
        let mut out = Vec::new();

        let restarted = cur.episode_id != prev.episode_id;
        if restarted {
            out.push(JournalEvent::Start { episode_id, seed });
        } else {
            match (prev.phase, cur.phase) {
                (SessionPhase::Running, SessionPhase::Paused) => {
                    out.push(JournalEvent::Pause { episode_id });
                }
                (SessionPhase::Paused, SessionPhase::Running) => {
                    out.push(JournalEvent::Resume { episode_id });
                }
                _ => {}
            }
        }

        if cur.phase == SessionPhase::GameOver && (restarted || prev.phase != SessionPhase::GameOver) {
            out.push(JournalEvent::GameOver {
                episode_id,
                score: cur.score,
                lines: cur.lines,
                level: cur.level,
                pieces_spawned: cur.pieces_spawned,
            });
        }

        out
    }
}

/// A journal line: milliseconds since the journal was opened plus the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub t_ms: u64,
    #[serde(flatten)]
    pub event: JournalEvent,
}

pub struct EventJournal<W: Write = File> {
    out: Option<W>,
    buf: Vec<u8>,
    opened: Instant,
    written: u64,
}

impl EventJournal<File> {
    /// Append to `path`, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(file))
    }

    /// A journal that drops every event.
    pub fn disabled() -> Self {
        Self {
            out: None,
            buf: Vec::new(),
            opened: Instant::now(),
            written: 0,
        }
    }
}

impl<W: Write> EventJournal<W> {
    pub fn from_writer(out: W) -> Self {
        Self {
            out: Some(out),
            buf: Vec::with_capacity(256),
            opened: Instant::now(),
            written: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.out.is_some()
    }

    /// Number of records written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn record(&mut self, event: JournalEvent) {
        let Some(out) = self.out.as_mut() else {
            return;
        };

        let rec = JournalRecord {
            t_ms: self.opened.elapsed().as_millis() as u64,
            event,
        };

        self.buf.clear();
        if serde_json::to_writer(&mut self.buf, &rec).is_err() {
            return;
        }
        self.buf.push(b'\n');

        if out.write_all(&self.buf).and_then(|_| out.flush()).is_err() {
            self.out = None;
            return;
        }
        self.written += 1;
    }

    pub fn record_all(&mut self, events: impl IntoIterator<Item = JournalEvent>) {
        for event in events {
            self.record(event);
        }
    }

    pub fn into_inner(self) -> Option<W> {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn snap(phase: SessionPhase, episode_id: u32) -> GameSnapshot {
        GameSnapshot {
            phase,
            episode_id,
            ..GameSnapshot::default()
        }
    }

    #[test]
    fn test_records_are_json_lines() {
        let mut journal = EventJournal::from_writer(Vec::new());
        journal.record(JournalEvent::Start { episode_id: 1, seed: 7 });
        journal.record(JournalEvent::Pause { episode_id: 1 });
        assert_eq!(journal.written(), 2);

        let bytes = journal.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "start");
        assert_eq!(first["seed"], 7);
        assert!(first["t_ms"].is_u64());

        let second: JournalRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.event, JournalEvent::Pause { episode_id: 1 });
    }

    #[test]
    fn test_write_failure_disables_journal() {
        let mut journal = EventJournal::from_writer(FailingWriter);
        assert!(journal.is_enabled());
        journal.record(JournalEvent::Resume { episode_id: 1 });
        assert!(!journal.is_enabled());
        assert_eq!(journal.written(), 0);

        // Later events are dropped silently.
        journal.record(JournalEvent::Resume { episode_id: 1 });
    }

    #[test]
    fn test_disabled_journal_drops_events() {
        let mut journal = EventJournal::disabled();
        journal.record(JournalEvent::Start { episode_id: 1, seed: 1 });
        assert!(!journal.is_enabled());
        assert_eq!(journal.written(), 0);
    }

    #[test]
    fn test_lock_with_level_up() {
        let ev = LockEvent {
            lines_cleared: 1,
            points: 40,
            level: 2,
            level_up: true,
            score: 400,
        };
        let events = JournalEvent::from_lock(3, &ev, 920);
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            JournalEvent::LevelUp {
                episode_id: 3,
                level: 2,
                drop_interval_ms: 920
            }
        );
    }

    #[test]
    fn test_transitions() {
        let idle = snap(SessionPhase::Idle, 0);
        let running = snap(SessionPhase::Running, 1);
        let paused = snap(SessionPhase::Paused, 1);
        let over = snap(SessionPhase::GameOver, 1);

        assert_eq!(
            JournalEvent::from_transition(&idle, &running, 9),
            vec![JournalEvent::Start { episode_id: 1, seed: 9 }]
        );
        assert_eq!(
            JournalEvent::from_transition(&running, &paused, 9),
            vec![JournalEvent::Pause { episode_id: 1 }]
        );
        assert_eq!(
            JournalEvent::from_transition(&paused, &running, 9),
            vec![JournalEvent::Resume { episode_id: 1 }]
        );
        assert!(matches!(
            JournalEvent::from_transition(&running, &over, 9)[..],
            [JournalEvent::GameOver { episode_id: 1, .. }]
        ));
        assert!(JournalEvent::from_transition(&over, &over, 9).is_empty());
        assert!(JournalEvent::from_transition(&running, &running, 9).is_empty());
    }
}
