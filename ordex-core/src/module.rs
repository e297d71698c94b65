//! Swap-module value types: module parameters, module-local balances,
//! pools, and pending swap inscriptions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::decimal::{Decimal, MAX_PRECISION};
use crate::event::EventKey;
use crate::script::PkScript;
use crate::ticker::tick_key;

/// Canonical pool pair name: the lexicographic-minimum ordering of the
/// two lowercase ticker keys joined by `/`.
pub fn pool_pair_name(tick0: &str, tick1: &str) -> String {
    let a = tick_key(tick0);
    let b = tick_key(tick1);
    if a <= b {
        format!("{}/{}", a, b)
    } else {
        format!("{}/{}", b, a)
    }
}

/// Split a canonical pair name back into its two ticker keys.
pub fn split_pair_name(pair: &str) -> Option<(&str, &str)> {
    pair.split_once('/')
}

/// Static parameters of a deployed module.
///
/// The module id is the lowercase inscription id of the deploy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Module id (deploy inscription id).
    pub id: String,
    /// Human-readable name from the deploy payload.
    pub name: String,
    /// Source inscription reference, passed through.
    pub source: Option<String>,
    /// Script of the deployer.
    pub deployer: PkScript,
    /// Script of the sequencer allowed to commit.
    pub sequencer: PkScript,
    /// Script gas fees are collected to.
    pub gas_to: PkScript,
    /// Script the LP share of swap fees accrues to; empty when unset.
    pub lp_fee_to: PkScript,
    /// Ticker gas fees are charged in.
    pub gas_tick: String,
    /// Swap fee rate at precision 18 (e.g. 0.003).
    pub swap_fee_rate: Decimal,
    /// Deploy height.
    pub deploy_height: u32,
    /// Deploy transaction index.
    pub deploy_tx_index: u32,
    /// Deploy inscription number.
    pub inscription_number: i64,
}

/// Module-local balance of one (address, ticker) pair.
///
/// Invariant: the module balance is the sum of the five component
/// balances, and `ready_to_withdraw` equals the sum of
/// `ready_to_withdraw_map` amounts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleTokenBalance {
    /// Ticker name, original case.
    pub tick: String,
    /// Owner script.
    pub pk_script: PkScript,
    /// Balance usable by swap functions.
    pub swap_account: Decimal,
    /// Module-level spendable balance.
    pub available: Decimal,
    /// Mempool-safe portion of `available`.
    pub available_safe: Decimal,
    /// Balance locked behind pending approves.
    pub approveable: Decimal,
    /// Balance locked behind pending conditional approves.
    pub cond_approveable: Decimal,
    /// Balance queued for withdrawal.
    pub ready_to_withdraw: Decimal,
    /// Pending withdraw amounts keyed by the inscribe event key.
    pub ready_to_withdraw_map: HashMap<EventKey, Decimal>,
    /// Height of the last mutation.
    pub update_height: u32,
}

impl ModuleTokenBalance {
    /// An empty module balance at the ticker's precision.
    pub fn new(tick: &str, pk_script: PkScript, precision: u32) -> Self {
        Self {
            tick: tick.to_string(),
            pk_script,
            swap_account: Decimal::zero(precision),
            available: Decimal::zero(precision),
            available_safe: Decimal::zero(precision),
            approveable: Decimal::zero(precision),
            cond_approveable: Decimal::zero(precision),
            ready_to_withdraw: Decimal::zero(precision),
            ready_to_withdraw_map: HashMap::new(),
            update_height: 0,
        }
    }

    /// Sum of all five component balances.
    pub fn module_balance(&self) -> Decimal {
        self.swap_account
            .add(&self.available)
            .add(&self.approveable)
            .add(&self.cond_approveable)
            .add(&self.ready_to_withdraw)
    }
}

/// Reserves and LP total of one pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoolBalance {
    /// Canonical pair name.
    pub pair: String,
    /// Lowercase ticker keys in canonical order.
    pub ticks: [String; 2],
    /// Reserves, indexed like `ticks`.
    pub reserves: [Decimal; 2],
    /// Total LP issued, at precision 18.
    pub lp_total: Decimal,
    /// Height of the last mutation.
    pub update_height: u32,
}

impl PoolBalance {
    /// An empty pool for the given tickers at their precisions.
    pub fn new(tick0: &str, precision0: u32, tick1: &str, precision1: u32) -> Self {
        let a = tick_key(tick0);
        let b = tick_key(tick1);
        let (ticks, precisions) = if a <= b {
            ([a, b], [precision0, precision1])
        } else {
            ([b, a], [precision1, precision0])
        };
        Self {
            pair: format!("{}/{}", ticks[0], ticks[1]),
            ticks,
            reserves: [
                Decimal::zero(precisions[0]),
                Decimal::zero(precisions[1]),
            ],
            lp_total: Decimal::zero(MAX_PRECISION),
            update_height: 0,
        }
    }

    /// Index of a ticker key within the pair, if present.
    pub fn side_of(&self, tick: &str) -> Option<usize> {
        let key = tick_key(tick);
        self.ticks.iter().position(|t| *t == key)
    }
}

/// Running conditional-approve ledger for one ticker inside a module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CondStateBalance {
    /// Ticker name, original case.
    pub tick: String,
    /// Total deposited through conditional approves.
    pub deposit: Decimal,
    /// Total delivered to receivers.
    pub approve: Decimal,
    /// Total newly inscribed (not yet moved).
    pub new_approve: Decimal,
    /// Total cancelled back to owners.
    pub cancel_approve: Decimal,
}

impl CondStateBalance {
    /// An empty ledger at the ticker's precision.
    pub fn new(tick: &str, precision: u32) -> Self {
        Self {
            tick: tick.to_string(),
            deposit: Decimal::zero(precision),
            approve: Decimal::zero(precision),
            new_approve: Decimal::zero(precision),
            cancel_approve: Decimal::zero(precision),
        }
    }
}

/// A pending approve inscription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApproveInfo {
    /// Target module id.
    pub module: String,
    /// Ticker name, original case.
    pub tick: String,
    /// Approved amount.
    pub amount: Decimal,
    /// Script of the inscriber.
    pub owner: PkScript,
    /// Inscription id.
    pub inscription_id: String,
    /// Inscribe height.
    pub height: u32,
}

/// A pending conditional-approve inscription with its running balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CondApproveInfo {
    /// Target module id.
    pub module: String,
    /// Ticker name, original case.
    pub tick: String,
    /// Inscribed amount.
    pub amount: Decimal,
    /// Undelivered remainder; reaches zero once moved or cancelled.
    pub balance: Decimal,
    /// Script of the inscriber.
    pub owner: PkScript,
    /// Inscription id.
    pub inscription_id: String,
    /// Inscribe height.
    pub height: u32,
}

/// A pending withdraw inscription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WithdrawInfo {
    /// Target module id.
    pub module: String,
    /// Ticker name, original case.
    pub tick: String,
    /// Withdraw amount.
    pub amount: Decimal,
    /// Script of the inscriber.
    pub owner: PkScript,
    /// Inscription id.
    pub inscription_id: String,
    /// Inscribe height.
    pub height: u32,
}

/// A pending commit inscription: the raw body plus its parsed batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Target module id.
    pub module: String,
    /// Script of the inscriber.
    pub owner: PkScript,
    /// Inscription id (becomes the commit id once connected).
    pub inscription_id: String,
    /// Raw JSON body, kept verbatim for the verifier.
    pub body: Vec<u8>,
    /// Inscribe height.
    pub height: u32,
}
