//! The indexer state container.

use std::collections::HashMap;

use ordex_core::{
    tick_key, ApproveInfo, CommitInfo, CondApproveInfo, EventKey, HistoryRecord, HistoryType,
    PendingTransfer, PkScript, TickerInfo, UserBalance, WithdrawInfo,
};

use super::{IndexConfig, ModuleState};
use crate::history_log::HistoryLog;

/// Complete indexer state.
///
/// Exclusively owned by the single-writer core; readers get either a
/// borrowed snapshot the core promises not to mutate, or a cherry-picked
/// copy. Balance maps are flat tuple-keyed arenas — the by-user and
/// by-ticker views of the source are both projections of one map here.
#[derive(Clone, Debug)]
pub struct IndexState {
    /// Configuration threaded through all handlers.
    pub config: IndexConfig,
    /// Height of the most recently seen event.
    pub best_height: u32,
    /// Whether any handler mutated state since the last checkpoint.
    pub durty: bool,

    /// Deployed tickers keyed by lowercase name.
    pub tickers: HashMap<String, TickerInfo>,
    /// Balances keyed by (lowercase tick, script).
    pub balances: HashMap<(String, PkScript), UserBalance>,

    /// Pending inscribe-transfers keyed by creating event key.
    pub pending_transfers: HashMap<EventKey, PendingTransfer>,
    /// Pending approves keyed by creating event key.
    pub pending_approves: HashMap<EventKey, ApproveInfo>,
    /// Conditional approves keyed by creating event key. Entries stay
    /// after settling (balance zero) because later moves still dispatch.
    pub pending_cond_approves: HashMap<EventKey, CondApproveInfo>,
    /// Pending withdraws keyed by creating event key.
    pub pending_withdraws: HashMap<EventKey, WithdrawInfo>,
    /// Pending commits keyed by creating event key.
    pub pending_commits: HashMap<EventKey, CommitInfo>,

    /// Deployed modules keyed by module id.
    pub modules: HashMap<String, ModuleState>,

    /// Transfers consumed this block: event key to move height.
    pub transfer_removed: HashMap<EventKey, u32>,
    /// Approves consumed this block.
    pub approve_removed: HashMap<EventKey, u32>,
    /// Conditional approves settled this block.
    pub cond_approve_removed: HashMap<EventKey, u32>,
    /// Withdraws consumed this block.
    pub withdraw_removed: HashMap<EventKey, u32>,
    /// Commits consumed this block.
    pub commit_removed: HashMap<EventKey, u32>,

    /// Completed withdraws: inscription id to completion height.
    pub valid_withdraws: HashMap<String, u32>,

    /// The global history log.
    pub history: HistoryLog,
    /// Per-address history indices across all tickers.
    pub user_history: HashMap<PkScript, Vec<u32>>,
}

impl IndexState {
    /// Create an empty state with the given configuration.
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            best_height: 0,
            durty: false,
            tickers: HashMap::new(),
            balances: HashMap::new(),
            pending_transfers: HashMap::new(),
            pending_approves: HashMap::new(),
            pending_cond_approves: HashMap::new(),
            pending_withdraws: HashMap::new(),
            pending_commits: HashMap::new(),
            modules: HashMap::new(),
            transfer_removed: HashMap::new(),
            approve_removed: HashMap::new(),
            cond_approve_removed: HashMap::new(),
            withdraw_removed: HashMap::new(),
            commit_removed: HashMap::new(),
            valid_withdraws: HashMap::new(),
            history: HistoryLog::new(),
            user_history: HashMap::new(),
        }
    }

    /// Look up a ticker by name (any case).
    pub fn ticker(&self, tick: &str) -> Option<&TickerInfo> {
        self.tickers.get(&tick_key(tick))
    }

    /// Look up a balance by ticker name (any case) and script.
    pub fn balance(&self, tick: &str, script: &[u8]) -> Option<&UserBalance> {
        self.balances.get(&(tick_key(tick), script.to_vec()))
    }

    /// Get or create the balance row for (ticker, script) at the
    /// ticker's precision.
    ///
    /// # Panics
    /// Panics if the ticker is not deployed; handlers validate the
    /// ticker before touching balances.
    pub fn balance_mut(&mut self, tick: &str, script: &PkScript) -> &mut UserBalance {
        let key = tick_key(tick);
        let info = self
            .tickers
            .get(&key)
            .unwrap_or_else(|| panic!("balance for undeployed ticker {:?}", tick));
        let ticker = info.ticker.clone();
        let precision = info.decimal as u32;
        self.balances
            .entry((key, script.clone()))
            .or_insert_with(|| UserBalance::new(&ticker, script.clone(), precision))
    }

    /// Append a history record and distribute its index into the
    /// ticker, per-user, and per-kind sublists.
    ///
    /// Returns `None` when history is disabled.
    pub fn push_history(&mut self, record: HistoryRecord) -> Option<u32> {
        if !self.config.enable_history {
            return None;
        }
        let index = self.history.append(record.height, &record);
        let key = tick_key(&record.tick);

        if let Some(info) = self.tickers.get_mut(&key) {
            info.history.push(index);
            match record.kind {
                HistoryType::InscribeMint => info.history_mint.push(index),
                HistoryType::InscribeTransfer => info.history_inscribe_transfer.push(index),
                HistoryType::Transfer
                | HistoryType::Send
                | HistoryType::Receive
                | HistoryType::Withdraw => info.history_transfer.push(index),
                HistoryType::InscribeDeploy => {}
            }
        }

        // per-(ticker,user) sublists
        match record.kind {
            HistoryType::InscribeDeploy => {
                if let Some(b) = self.balances.get_mut(&(key.clone(), record.to.clone())) {
                    b.history.push(index);
                }
            }
            HistoryType::InscribeMint => {
                if let Some(b) = self.balances.get_mut(&(key.clone(), record.to.clone())) {
                    b.history.push(index);
                    b.history_mint.push(index);
                }
            }
            HistoryType::InscribeTransfer => {
                if let Some(b) = self.balances.get_mut(&(key.clone(), record.to.clone())) {
                    b.history.push(index);
                    b.history_inscribe_transfer.push(index);
                }
            }
            HistoryType::Transfer => {
                if let Some(b) = self.balances.get_mut(&(key.clone(), record.to.clone())) {
                    b.history.push(index);
                    b.history_send.push(index);
                    b.history_receive.push(index);
                }
            }
            HistoryType::Send => {
                if let Some(b) = self.balances.get_mut(&(key.clone(), record.from.clone())) {
                    b.history.push(index);
                    b.history_send.push(index);
                }
            }
            HistoryType::Receive | HistoryType::Withdraw => {
                if let Some(b) = self.balances.get_mut(&(key.clone(), record.to.clone())) {
                    b.history.push(index);
                    b.history_receive.push(index);
                }
            }
        }

        // per-address history across tickers
        let user = match record.kind {
            HistoryType::Send => record.from.clone(),
            _ => record.to.clone(),
        };
        self.user_history.entry(user).or_default().push(index);

        Some(index)
    }

    /// Drop zero-balance rows, keeping the balance arena tight.
    ///
    /// Run after a batch of events, never mid-block: handlers may
    /// legitimately pass a row through zero within a block.
    pub fn purge_empty_balances(&mut self) {
        self.balances.retain(|_, b| !b.is_empty());
    }

    /// Purge the per-block working sets after a checkpoint. The full
    /// history log is kept.
    pub fn purge_block_working_sets(&mut self) {
        self.transfer_removed.clear();
        self.approve_removed.clear();
        self.cond_approve_removed.clear();
        self.withdraw_removed.clear();
        self.commit_removed.clear();
        self.history.clear_block_tail();
    }
}
