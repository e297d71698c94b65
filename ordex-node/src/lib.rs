//! Ordex indexer node: wiring for the event loop, CLI, and sources.

pub mod cli;
pub mod config;
pub mod runner;
pub mod source;

pub use cli::Cli;
pub use config::NodeConfig;
pub use runner::{run, shutdown_channel, RunStats, ShutdownTx};
pub use source::{read_events, spawn_file_source};
