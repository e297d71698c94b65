//! Row-key layout.
//!
//! Every row is keyed `<table> 0x00 <row id> <height BE>`: the table tag
//! gives prefix iteration, the row id identifies the logical key, and
//! the trailing big-endian height makes latest-per-key restores a
//! max-by-suffix scan.

use crate::error::StorageError;

/// Logical table names.
pub mod table {
    /// Per-ticker deploy metadata and totals.
    pub const TICKER_INFO: &str = "ticker_info";
    /// Per-(ticker, script) balances.
    pub const USER_BALANCE: &str = "user_balance";
    /// Transfer inscriptions consumed by a move.
    pub const TRANSFER_STATE: &str = "transfer_state";
    /// Live transfer inscriptions.
    pub const VALID_TRANSFER: &str = "valid_transfer";
    /// Module static parameters.
    pub const SWAP_INFO: &str = "swap_info";
    /// Module history rows.
    pub const SWAP_HISTORY: &str = "swap_history";
    /// Module-local balances.
    pub const SWAP_USER_BALANCE: &str = "swap_user_balance";
    /// Pool reserves and LP totals.
    pub const SWAP_POOL_BALANCE: &str = "swap_pool_balance";
    /// Per-user LP holdings.
    pub const SWAP_USER_LP_BALANCE: &str = "swap_user_lp_balance";
    /// Commit inscriptions consumed by a move.
    pub const SWAP_COMMIT_STATE: &str = "swap_commit_state";
    /// Live commit inscriptions.
    pub const VALID_COMMIT: &str = "valid_commit";
    /// Approve inscriptions consumed by a move.
    pub const SWAP_APPROVE_STATE: &str = "swap_approve_state";
    /// Live approve inscriptions.
    pub const VALID_APPROVE: &str = "valid_approve";
    /// Conditional approves settled by a move.
    pub const SWAP_COND_APPROVE_STATE: &str = "swap_cond_approve_state";
    /// Conditional-approve inscriptions with running balances.
    pub const VALID_COND_APPROVE: &str = "valid_cond_approve";
    /// Withdraw inscriptions consumed by a move.
    pub const SWAP_WITHDRAW_STATE: &str = "swap_withdraw_state";
    /// Live withdraw inscriptions.
    pub const VALID_WITHDRAW: &str = "valid_withdraw";
    /// Commit chain membership per module.
    pub const SWAP_COMMIT_CHAIN: &str = "swap_commit_chain";
    /// Per-ticker conditional-approve ledgers.
    pub const SWAP_COND_STATE_BALANCE: &str = "swap_cond_state_balance";
    /// Completed withdraw inscription ids by height.
    pub const MODULE_WITHDRAWALS: &str = "module_withdrawals";
}

/// Prefix covering every row of a table.
pub fn table_prefix(table: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(table.len() + 1);
    prefix.extend_from_slice(table.as_bytes());
    prefix.push(0);
    prefix
}

/// Full row key for `(table, id)` at `height`.
pub fn row_key(table: &str, id: &[u8], height: u32) -> Vec<u8> {
    let mut key = table_prefix(table);
    key.extend_from_slice(id);
    key.extend_from_slice(&height.to_be_bytes());
    key
}

/// Split a full key back into `(id, height)`, stripping the table prefix.
pub fn parse_row_key<'a>(table: &str, key: &'a [u8]) -> Result<(&'a [u8], u32), StorageError> {
    let prefix_len = table.len() + 1;
    if key.len() < prefix_len + 4 {
        return Err(StorageError::InvalidKey(format!(
            "{} row key too short: {} bytes",
            table,
            key.len()
        )));
    }
    let (id, height_bytes) = key[prefix_len..].split_at(key.len() - prefix_len - 4);
    let height = u32::from_be_bytes(height_bytes.try_into().expect("4 bytes split off"));
    Ok((id, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_key_roundtrip() {
        let key = row_key(table::TICKER_INFO, b"ordi", 837_090);
        let (id, height) = parse_row_key(table::TICKER_INFO, &key).unwrap();
        assert_eq!(id, b"ordi");
        assert_eq!(height, 837_090);
    }

    #[test]
    fn test_heights_sort_ascending_per_id() {
        let a = row_key(table::USER_BALANCE, b"x", 5);
        let b = row_key(table::USER_BALANCE, b"x", 100);
        assert!(a < b);
    }

    #[test]
    fn test_short_key_rejected() {
        assert!(parse_row_key(table::TICKER_INFO, b"ticker_info\x00ab").is_err());
    }
}
