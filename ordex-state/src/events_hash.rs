//! Per-block events hash.
//!
//! Downstream consumers cross-check indexers by hashing a stable textual
//! encoding of each block's valid history records. The record formats
//! are consensus-fixed; changing a single byte forks every downstream
//! comparison.

use sha2::{Digest, Sha256};

use ordex_core::{script_hex, tick_key, HistoryRecord, HistoryType};

use crate::state::IndexState;

/// Encode the current block's valid history records, in append order.
pub fn block_events(state: &IndexState) -> Vec<String> {
    let mut events = Vec::new();
    for &index in state.history.block_tail() {
        let record = match state.history.get(index) {
            Some(r) => r,
            None => continue,
        };
        if !record.valid {
            continue;
        }
        if let Some(line) = encode_record(state, &record) {
            events.push(line);
        }
    }
    events
}

/// Hash of the current block's events: SHA-256 over the newline-joined
/// encoded records.
pub fn block_events_hash(state: &IndexState) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for line in block_events(state) {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().into()
}

/// Encode one record, or `None` for kinds outside the hash
/// (the receive half of a transfer carries no extra information).
fn encode_record(state: &IndexState, record: &HistoryRecord) -> Option<String> {
    let lower = tick_key(&record.tick);
    let info = state.tickers.get(&lower)?;
    let id = &record.inscription_id;
    let from = script_hex(&record.from);
    let to = script_hex(&record.to);

    let line = match record.kind {
        HistoryType::InscribeDeploy => format!(
            "deploy-inscribe;{};{};{};{};{};{};{};{}",
            id,
            to,
            lower,
            info.ticker,
            info.max,
            info.decimal,
            info.limit,
            if info.self_mint { 1 } else { 0 },
        ),
        HistoryType::InscribeMint => format!(
            "mint-inscribe;{};{};{};{};{}",
            id, to, lower, info.ticker, record.amount
        ),
        HistoryType::InscribeTransfer => format!(
            "transfer-inscribe;{};{};{};{};{}",
            id, to, lower, info.ticker, record.amount
        ),
        HistoryType::Transfer | HistoryType::Send => format!(
            "transfer-transfer;{};{};{};{};{};{}",
            id, from, to, lower, info.ticker, record.amount
        ),
        HistoryType::Withdraw => format!(
            "withdraw-transfer;{};{};{};{};{};{}",
            id, from, to, lower, info.ticker, record.amount
        ),
        HistoryType::Receive => return None,
    };
    Some(line)
}
