//! Per-(address, ticker) balances and pending transfers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;
use crate::event::EventKey;
use crate::script::PkScript;

/// A transferable amount registered by an inscribe-transfer, waiting for
/// the first move of its inscription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingTransfer {
    /// Ticker name, original case.
    pub tick: String,
    /// Inscribed amount.
    pub amount: Decimal,
    /// Script of the inscriber (the sender on the eventual move).
    pub owner: PkScript,
    /// Height the inscribe happened at.
    pub height: u32,
    /// Transaction index of the inscribe.
    pub tx_index: u32,
    /// Inscription id.
    pub inscription_id: String,
}

/// Balance of one (address, ticker) pair.
///
/// Invariants: `overall == available + transferable`,
/// `available_safe <= available`, and `transferable` equals the sum of
/// the pending transfer amounts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserBalance {
    /// Ticker name, original case.
    pub tick: String,
    /// Owner script.
    pub pk_script: PkScript,
    /// Spendable balance.
    pub available: Decimal,
    /// Mempool-safe portion of `available` (confirmed credits only).
    pub available_safe: Decimal,
    /// Amount locked in pending transfer inscriptions.
    pub transferable: Decimal,
    /// Pending transfers keyed by the inscribe event key.
    pub pending_transfers: HashMap<EventKey, PendingTransfer>,
    /// Height of the last mutation, for per-block delta collection.
    pub update_height: u32,
    /// Indices into the global history log.
    pub history: Vec<u32>,
    /// Mint sublist.
    pub history_mint: Vec<u32>,
    /// Inscribe-transfer sublist.
    pub history_inscribe_transfer: Vec<u32>,
    /// Outgoing-transfer sublist.
    pub history_send: Vec<u32>,
    /// Incoming-transfer sublist.
    pub history_receive: Vec<u32>,
}

impl UserBalance {
    /// An empty balance at the ticker's precision.
    pub fn new(tick: &str, pk_script: PkScript, precision: u32) -> Self {
        Self {
            tick: tick.to_string(),
            pk_script,
            available: Decimal::zero(precision),
            available_safe: Decimal::zero(precision),
            transferable: Decimal::zero(precision),
            pending_transfers: HashMap::new(),
            update_height: 0,
            history: Vec::new(),
            history_mint: Vec::new(),
            history_inscribe_transfer: Vec::new(),
            history_send: Vec::new(),
            history_receive: Vec::new(),
        }
    }

    /// `available + transferable`.
    pub fn overall(&self) -> Decimal {
        self.available.add(&self.transferable)
    }

    /// Whether both balance components are zero (row eligible for purge).
    pub fn is_empty(&self) -> bool {
        self.available.is_zero() && self.transferable.is_zero()
    }
}
