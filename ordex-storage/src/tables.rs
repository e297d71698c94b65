//! Row value types.
//!
//! Rows are flat: no maps, no history index lists. Pending maps are
//! reconstructed at restore time from the `valid_*` tables, and the
//! history log is not persisted (it is rebuilt by replay when needed).

use serde::{Deserialize, Serialize};

use ordex_core::{CommitInfo, Decimal, ModuleInfo, PkScript, TickerInfo, UserBalance};

/// One `ticker_info` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickerRow {
    /// Original-case name.
    pub ticker: String,
    /// Decimal places.
    pub decimal: u8,
    /// Maximum supply.
    pub max: Decimal,
    /// Per-mint limit.
    pub limit: Decimal,
    /// Self-mint flag.
    pub self_mint: bool,
    /// Deployer script.
    pub deployer: PkScript,
    /// Deploy inscription id.
    pub inscription_id: String,
    /// Deploy inscription number.
    pub inscription_number: i64,
    /// Deploy height.
    pub deploy_height: u32,
    /// Deploy transaction index.
    pub deploy_tx_index: u32,
    /// Deploy block timestamp.
    pub deploy_block_time: u32,
    /// Total minted.
    pub total_minted: Decimal,
    /// Confirmed minted.
    pub confirmed_minted: Decimal,
    /// Accepted mint count.
    pub mint_times: u32,
    /// Burned total.
    pub burned: Decimal,
    /// Completion height; 0 while incomplete.
    pub complete_height: u32,
}

impl From<&TickerInfo> for TickerRow {
    fn from(info: &TickerInfo) -> Self {
        Self {
            ticker: info.ticker.clone(),
            decimal: info.decimal,
            max: info.max.clone(),
            limit: info.limit.clone(),
            self_mint: info.self_mint,
            deployer: info.deployer.clone(),
            inscription_id: info.inscription_id.clone(),
            inscription_number: info.inscription_number,
            deploy_height: info.deploy_height,
            deploy_tx_index: info.deploy_tx_index,
            deploy_block_time: info.deploy_block_time,
            total_minted: info.total_minted.clone(),
            confirmed_minted: info.confirmed_minted.clone(),
            mint_times: info.mint_times,
            burned: info.burned.clone(),
            complete_height: info.complete_height,
        }
    }
}

impl TickerRow {
    /// Rebuild the in-memory ticker (history index lists start empty).
    pub fn into_info(self) -> TickerInfo {
        TickerInfo {
            ticker: self.ticker,
            decimal: self.decimal,
            max: self.max,
            limit: self.limit,
            self_mint: self.self_mint,
            deployer: self.deployer,
            inscription_id: self.inscription_id,
            inscription_number: self.inscription_number,
            deploy_height: self.deploy_height,
            deploy_tx_index: self.deploy_tx_index,
            deploy_block_time: self.deploy_block_time,
            total_minted: self.total_minted,
            confirmed_minted: self.confirmed_minted,
            mint_times: self.mint_times,
            burned: self.burned,
            complete_height: self.complete_height,
            update_height: 0,
            history: Vec::new(),
            history_mint: Vec::new(),
            history_inscribe_transfer: Vec::new(),
            history_transfer: Vec::new(),
        }
    }
}

/// One `user_balance` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserBalanceRow {
    /// Ticker name, original case.
    pub tick: String,
    /// Owner script.
    pub pk_script: PkScript,
    /// Available balance.
    pub available: Decimal,
    /// Mempool-safe available balance.
    pub available_safe: Decimal,
    /// Transferable balance.
    pub transferable: Decimal,
}

impl From<&UserBalance> for UserBalanceRow {
    fn from(balance: &UserBalance) -> Self {
        Self {
            tick: balance.tick.clone(),
            pk_script: balance.pk_script.clone(),
            available: balance.available.clone(),
            available_safe: balance.available_safe.clone(),
            transferable: balance.transferable.clone(),
        }
    }
}

impl UserBalanceRow {
    /// Rebuild the in-memory balance (pending map refilled separately
    /// from the `valid_transfer` table).
    pub fn into_balance(self) -> UserBalance {
        let mut balance = UserBalance::new(&self.tick, self.pk_script, self.available.precision());
        balance.available = self.available;
        balance.available_safe = self.available_safe;
        balance.transferable = self.transferable;
        balance
    }
}

/// One `swap_info` row: static parameters plus the chain head, which is
/// not derivable from the chain membership rows alone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModuleInfoRow {
    /// Static module parameters.
    pub info: ModuleInfo,
    /// Id of the last connected commit.
    pub chain_head: String,
}

/// One `swap_user_balance` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleBalanceRow {
    /// Ticker name, original case.
    pub tick: String,
    /// Owner script.
    pub pk_script: PkScript,
    /// Swap-account balance.
    pub swap_account: Decimal,
    /// Module-level available balance.
    pub available: Decimal,
    /// Mempool-safe portion of `available`.
    pub available_safe: Decimal,
    /// Approveable balance.
    pub approveable: Decimal,
    /// Conditionally approveable balance.
    pub cond_approveable: Decimal,
    /// Ready-to-withdraw total.
    pub ready_to_withdraw: Decimal,
}

impl From<&ordex_core::ModuleTokenBalance> for ModuleBalanceRow {
    fn from(balance: &ordex_core::ModuleTokenBalance) -> Self {
        Self {
            tick: balance.tick.clone(),
            pk_script: balance.pk_script.clone(),
            swap_account: balance.swap_account.clone(),
            available: balance.available.clone(),
            available_safe: balance.available_safe.clone(),
            approveable: balance.approveable.clone(),
            cond_approveable: balance.cond_approveable.clone(),
            ready_to_withdraw: balance.ready_to_withdraw.clone(),
        }
    }
}

impl ModuleBalanceRow {
    /// Rebuild the in-memory module balance (the ready-to-withdraw map
    /// is refilled from the `valid_withdraw` table).
    pub fn into_balance(self) -> ordex_core::ModuleTokenBalance {
        let mut balance = ordex_core::ModuleTokenBalance::new(
            &self.tick,
            self.pk_script,
            self.swap_account.precision(),
        );
        balance.swap_account = self.swap_account;
        balance.available = self.available;
        balance.available_safe = self.available_safe;
        balance.approveable = self.approveable;
        balance.cond_approveable = self.cond_approveable;
        balance.ready_to_withdraw = self.ready_to_withdraw;
        balance
    }
}

/// One `swap_commit_chain` row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitChainRow {
    /// Commit inscription id.
    pub commit_id: String,
    /// Whether the commit verified.
    pub valid: bool,
    /// Whether the commit is connected to the chain.
    pub connected: bool,
    /// The parked commit data for valid-but-unconnected commits, so a
    /// restored indexer can still connect them later.
    pub pending: Option<CommitInfo>,
}
