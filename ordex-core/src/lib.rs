//! # Ordex Core
//!
//! Core types and arithmetic for the ordex inscription-token indexer:
//! - Fixed-point decimal arithmetic with explicit per-value precision
//! - Inscription event and payload models (serde)
//! - Ticker, balance, module, pool, and history value types
//! - Deterministic binary serialization

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod balance;
pub mod constants;
pub mod decimal;
pub mod error;
pub mod event;
pub mod history;
pub mod module;
pub mod payload;
pub mod script;
pub mod serialization;
pub mod ticker;

// Re-export commonly used types at crate root
pub use balance::{PendingTransfer, UserBalance};
pub use decimal::{Decimal, MAX_PRECISION};
pub use error::{DecimalError, PayloadError, SerializationError};
pub use event::{event_key, event_key_height, EventKey, InscriptionEvent};
pub use history::{HistoryRecord, HistoryType, ModuleHistoryRecord, ModuleHistoryType};
pub use module::{
    pool_pair_name, split_pair_name, ApproveInfo, CommitInfo, CondApproveInfo, CondStateBalance,
    ModuleInfo, ModuleTokenBalance, PoolBalance, WithdrawInfo,
};
pub use script::{is_burn, script_from_hex, script_hex, PkScript};
pub use ticker::{tick_key, tick_len_ok, TickerInfo};
