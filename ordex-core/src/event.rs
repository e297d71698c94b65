//! Inscription events consumed by the indexer.

use serde::{Deserialize, Serialize};

use crate::script::PkScript;

/// Deterministic 12-byte inscription key: little-endian
/// `(height: u32, idx_in_block: u64)`.
pub type EventKey = [u8; 12];

/// Build an [`EventKey`] from its components.
pub fn event_key(height: u32, idx_in_block: u64) -> EventKey {
    let mut key = [0u8; 12];
    key[..4].copy_from_slice(&height.to_le_bytes());
    key[4..].copy_from_slice(&idx_in_block.to_le_bytes());
    key
}

/// Height component of an [`EventKey`].
pub fn event_key_height(key: &EventKey) -> u32 {
    u32::from_le_bytes(key[..4].try_into().expect("fixed slice"))
}

/// One inscription event: either the creation of an inscription or a
/// move (spend of the output carrying it).
///
/// Events arrive totally ordered by
/// `(height, tx_index, in-tx sequence, move sequence)`; the producer is
/// responsible for that order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InscriptionEvent {
    /// True for a move, false for the creating reveal.
    pub is_transfer: bool,
    /// Key of the creating inscription (stable across moves).
    pub create_key: EventKey,
    /// Block height of this event.
    pub height: u32,
    /// Transaction index within the block.
    pub tx_index: u32,
    /// Move sequence: 1 for the first move of an inscription.
    pub sequence: u32,
    /// Sat offset within the carrying output.
    pub sat_offset: u64,
    /// Output value in satoshi; 0 means sent as fee.
    pub satoshi: u64,
    /// Output script of the event (receiver on moves).
    pub pk_script: PkScript,
    /// Global inscription number.
    pub inscription_number: i64,
    /// Inscription id (`<txid>i<index>`), passed through opaquely.
    pub inscription_id: String,
    /// Raw content body of the inscription.
    pub content_body: Vec<u8>,
    /// Parent inscription id, when revealed with one.
    pub parent: Option<String>,
    /// Block timestamp; 0 for mempool-sourced events.
    pub block_time: u32,
}
