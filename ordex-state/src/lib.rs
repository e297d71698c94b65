//! State machine for the ordex indexer.
//!
//! This crate implements the complete deterministic state transition
//! function: given the current state and a totally ordered inscription
//! event stream, it produces the next state. Every protocol rule is
//! enforced here, with no networking or persistence.
//!
//! # Key Components
//!
//! - [`IndexState`]: the in-memory state container
//! - [`apply_event`] / [`apply_events`]: the event dispatcher
//! - [`verify_swap_commit`]: sandboxed commit verification
//! - [`block_events_hash`]: the per-block consensus hash
//! - [`ProtocolError`]: soft validation errors (hard errors panic)

mod dispatch;
mod error;
mod events_hash;
mod handlers;
mod history_log;
mod query;
mod snapshot;
mod state;
mod swap;
#[cfg(test)]
mod testing;
mod verifier;

pub use dispatch::{apply_event, apply_events};
pub use error::{HandlerResult, Outcome, ProtocolError};
pub use events_hash::{block_events, block_events_hash};
pub use history_log::HistoryLog;
pub use query::{
    AddressSummaryAtHeightRow, AddressSummaryRow, HolderRow, StatusSort, TickerHistoryKind,
};
pub use snapshot::{cherry_pick, Selection};
pub use state::{IndexConfig, IndexState, ModuleState};
pub use verifier::{verify_swap_commit, CommitVerification};
