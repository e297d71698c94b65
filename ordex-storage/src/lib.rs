//! Checkpoint storage for the ordex indexer.
//!
//! The indexer core treats persistence as a per-block sink and a
//! point-in-time source. This crate provides both over an abstract KV
//! backend:
//! - [`KvBackend`] with [`MemoryBackend`] (tests) and [`RocksBackend`]
//! - [`CheckpointStore`]: height-tagged delta rows, atomic per-block
//!   batches, latest-per-key restore

mod checkpoint;
mod error;
mod keys;
mod kv;
mod tables;

pub use checkpoint::CheckpointStore;
pub use error::StorageError;
pub use keys::{parse_row_key, row_key, table, table_prefix};
pub use kv::{BatchOp, KvBackend, MemoryBackend, PrefixIterator, RocksBackend, WriteBatch};
pub use tables::{CommitChainRow, ModuleBalanceRow, ModuleInfoRow, TickerRow, UserBalanceRow};
