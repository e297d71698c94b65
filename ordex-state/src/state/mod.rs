//! State containers.
//!
//! This module provides:
//! - [`IndexState`]: the whole indexer state, exclusively owned by the core
//! - [`ModuleState`]: per-module swap state nested inside it
//! - [`IndexConfig`]: explicit configuration threaded through handlers

mod index_state;
mod module_state;

pub use index_state::IndexState;
pub use module_state::ModuleState;

use ordex_core::constants;

/// Indexer configuration.
///
/// A fresh value per indexer instance; tests override the activation
/// heights to exercise boundary behavior.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Lowercase ticker keys allowed to deploy; empty disables the list.
    pub tick_allowlist: Vec<String>,
    /// Height at which 5-byte self-mint tickers activate.
    pub self_mint_activation_height: u32,
    /// Height at which module withdraws activate.
    pub swap_withdraw_activation_height: u32,
    /// Whether to record history (disabled for bulk resync).
    pub enable_history: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            tick_allowlist: Vec::new(),
            self_mint_activation_height: constants::SELF_MINT_ACTIVATION_HEIGHT,
            swap_withdraw_activation_height: constants::SWAP_WITHDRAW_ACTIVATION_HEIGHT,
            enable_history: true,
        }
    }
}
