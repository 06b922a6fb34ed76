//! Blockfall (workspace facade crate).
//!
//! Re-exports the member crates under stable paths
//! (`blockfall::{core,input,term,types}`) and owns the pieces that only the
//! shell needs: environment configuration and the session event journal.

pub mod config;
pub mod journal;

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_term as term;
pub use blockfall_types as types;

pub use config::GameConfig;
pub use journal::{EventJournal, JournalEvent, JournalRecord};
