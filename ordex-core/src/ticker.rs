//! Per-ticker deploy metadata and running totals.

use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;
use crate::script::PkScript;

/// Lowercase map key for a ticker name.
pub fn tick_key(tick: &str) -> String {
    tick.to_lowercase()
}

/// Whether the name has a legal ticker byte length (4, or 5 for
/// self-mint deploys).
pub fn tick_len_ok(tick: &str) -> bool {
    matches!(tick.len(), 4 | 5)
}

/// A deployed ticker: deploy parameters plus running totals.
///
/// The map key is the lowercase name; `ticker` preserves the original
/// case from the deploy payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickerInfo {
    /// Original-case name.
    pub ticker: String,
    /// Decimal places for all amounts of this ticker.
    pub decimal: u8,
    /// Maximum supply.
    pub max: Decimal,
    /// Per-mint limit.
    pub limit: Decimal,
    /// Whether minting requires a child of the deploy inscription.
    pub self_mint: bool,
    /// Deployer script.
    pub deployer: PkScript,
    /// Deploy inscription id.
    pub inscription_id: String,
    /// Deploy inscription number.
    pub inscription_number: i64,
    /// Deploy height.
    pub deploy_height: u32,
    /// Deploy transaction index within its block.
    pub deploy_tx_index: u32,
    /// Deploy block timestamp.
    pub deploy_block_time: u32,
    /// Total minted so far (never exceeds `max`).
    pub total_minted: Decimal,
    /// Minted amount from confirmed blocks only.
    pub confirmed_minted: Decimal,
    /// Number of accepted mints.
    pub mint_times: u32,
    /// Total burned via OP_RETURN sends.
    pub burned: Decimal,
    /// First height at which `total_minted == max`; 0 while incomplete.
    pub complete_height: u32,
    /// Height of the last mutation, for per-block delta collection.
    pub update_height: u32,
    /// Indices into the global history log.
    pub history: Vec<u32>,
    /// Mint sublist of `history`.
    pub history_mint: Vec<u32>,
    /// Inscribe-transfer sublist of `history`.
    pub history_inscribe_transfer: Vec<u32>,
    /// Transfer sublist of `history`.
    pub history_transfer: Vec<u32>,
}

impl TickerInfo {
    /// Remaining mintable amount.
    pub fn remaining(&self) -> Decimal {
        self.max.sub(&self.total_minted)
    }

    /// Whether supply is fully minted.
    pub fn is_complete(&self) -> bool {
        self.total_minted.cmp(&self.max) == std::cmp::Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_key_lowercases() {
        assert_eq!(tick_key("OrDi"), "ordi");
        assert_eq!(tick_key("ordi"), "ordi");
    }

    #[test]
    fn test_tick_len() {
        assert!(tick_len_ok("ordi"));
        assert!(tick_len_ok("abcde"));
        assert!(!tick_len_ok("abc"));
        assert!(!tick_len_ok("abcdef"));
    }
}
