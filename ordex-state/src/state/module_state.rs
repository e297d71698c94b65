//! Per-module swap state.

use std::collections::{HashMap, HashSet};

use ordex_core::{
    CommitInfo, CondStateBalance, Decimal, ModuleHistoryRecord, ModuleInfo, ModuleTokenBalance,
    PkScript, PoolBalance, tick_key, MAX_PRECISION,
};

/// Dynamic state of one deployed module: module-local balances, pools,
/// LP holdings, the commit chain, and conditional-approve ledgers.
///
/// Balances and LP holdings are flat tuple-keyed maps; both "by user"
/// and "by ticker" views are projections of the same map.
#[derive(Clone, Debug)]
pub struct ModuleState {
    /// Static module parameters.
    pub info: ModuleInfo,
    /// Module-local balances keyed by (lowercase tick, script).
    pub balances: HashMap<(String, PkScript), ModuleTokenBalance>,
    /// Pools keyed by canonical pair name.
    pub pools: HashMap<String, PoolBalance>,
    /// Per-user LP keyed by (pair, script), precision 18.
    pub user_lp: HashMap<(String, PkScript), Decimal>,
    /// Commit ids rejected by verification.
    pub commit_invalid: HashSet<String>,
    /// Commits moved but not yet connected to the chain, by commit id.
    pub commit_pending: HashMap<String, CommitInfo>,
    /// Commit ids connected to the chain.
    pub commit_connected: HashSet<String>,
    /// Id of the last connected commit; empty before the first.
    pub chain_head: String,
    /// Conditional-approve ledgers keyed by lowercase tick.
    pub cond_state: HashMap<String, CondStateBalance>,
    /// Module history, in append order.
    pub history: Vec<ModuleHistoryRecord>,
    /// Height of the last mutation.
    pub update_height: u32,
}

impl ModuleState {
    /// Fresh state for a newly deployed module.
    pub fn new(info: ModuleInfo) -> Self {
        Self {
            info,
            balances: HashMap::new(),
            pools: HashMap::new(),
            user_lp: HashMap::new(),
            commit_invalid: HashSet::new(),
            commit_pending: HashMap::new(),
            commit_connected: HashSet::new(),
            chain_head: String::new(),
            cond_state: HashMap::new(),
            history: Vec::new(),
            update_height: 0,
        }
    }

    /// Look up a module-local balance.
    pub fn balance(&self, tick: &str, script: &[u8]) -> Option<&ModuleTokenBalance> {
        self.balances.get(&(tick_key(tick), script.to_vec()))
    }

    /// Get or create a module-local balance at the ticker's precision.
    pub fn balance_mut(
        &mut self,
        tick: &str,
        precision: u32,
        script: &PkScript,
    ) -> &mut ModuleTokenBalance {
        self.balances
            .entry((tick_key(tick), script.clone()))
            .or_insert_with(|| ModuleTokenBalance::new(tick, script.clone(), precision))
    }

    /// LP held by `script` in `pair`; zero when absent.
    pub fn lp_of(&self, pair: &str, script: &[u8]) -> Decimal {
        self.user_lp
            .get(&(pair.to_string(), script.to_vec()))
            .cloned()
            .unwrap_or_else(|| Decimal::zero(MAX_PRECISION))
    }

    /// Set (or clear, when zero) the LP held by `script` in `pair`.
    pub fn set_lp(&mut self, pair: &str, script: &PkScript, lp: Decimal) {
        let key = (pair.to_string(), script.clone());
        if lp.is_zero() {
            self.user_lp.remove(&key);
        } else {
            self.user_lp.insert(key, lp);
        }
    }

    /// Get or create the conditional-approve ledger for a ticker.
    pub fn cond_state_mut(&mut self, tick: &str, precision: u32) -> &mut CondStateBalance {
        self.cond_state
            .entry(tick_key(tick))
            .or_insert_with(|| CondStateBalance::new(tick, precision))
    }
}
