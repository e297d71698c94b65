//! Read-only query surface.
//!
//! These are the exact contracts the serving facade builds on. All
//! methods borrow the state; the core promises not to mutate it for the
//! duration of a call (single-writer scheduling).

use std::collections::HashMap;

use ordex_core::payload::ResultCheck;
use ordex_core::{
    tick_key, Decimal, HistoryRecord, ModuleHistoryRecord, ModuleHistoryType, ModuleTokenBalance,
    PkScript, TickerInfo, MAX_PRECISION,
};

use crate::state::IndexState;
use crate::verifier::{self, CommitVerification};

/// Sort order for the ticker status listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusSort {
    /// By holder count, descending.
    Holders,
    /// By deploy height, newest first.
    Deploy,
    /// By total minted, descending.
    Minted,
    /// By history record count, descending.
    Transactions,
}

/// Per-kind selector for [`IndexState::ticker_history`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickerHistoryKind {
    /// Accepted mints.
    Mint,
    /// Transfer reveals.
    InscribeTransfer,
    /// Completed transfers (including withdraws and burns).
    Transfer,
}

/// One row of a holders listing.
#[derive(Clone, Debug)]
pub struct HolderRow {
    /// Holder script.
    pub pk_script: PkScript,
    /// `available + transferable`.
    pub overall: Decimal,
    /// Available balance.
    pub available: Decimal,
    /// Mempool-safe available balance.
    pub available_safe: Decimal,
    /// Transferable balance.
    pub transferable: Decimal,
}

/// One row of a per-address balance summary.
#[derive(Clone, Debug)]
pub struct AddressSummaryRow {
    /// Ticker name, original case.
    pub tick: String,
    /// Ticker precision.
    pub decimal: u8,
    /// `available + transferable`.
    pub overall: Decimal,
    /// Available balance.
    pub available: Decimal,
    /// Mempool-safe available balance.
    pub available_safe: Decimal,
    /// Transferable balance.
    pub transferable: Decimal,
}

/// One row of a historical per-address summary, reconstructed from
/// history snapshots.
#[derive(Clone, Debug)]
pub struct AddressSummaryAtHeightRow {
    /// Ticker name, original case.
    pub tick: String,
    /// Overall balance at the height, as recorded.
    pub overall: String,
    /// Available balance at the height.
    pub available: String,
    /// Transferable balance at the height.
    pub transferable: String,
}

/// Compare decimals of different precisions by real value.
fn value_cmp(a: &Decimal, b: &Decimal) -> std::cmp::Ordering {
    let a18 = Decimal::parse(&a.to_string(), MAX_PRECISION).expect("display reparses");
    let b18 = Decimal::parse(&b.to_string(), MAX_PRECISION).expect("display reparses");
    a18.cmp(&b18)
}

fn page<T>(mut items: Vec<T>, start: usize, limit: usize) -> (usize, Vec<T>) {
    let total = items.len();
    if start >= total {
        return (total, Vec::new());
    }
    let items = items.split_off(start);
    (total, items.into_iter().take(limit).collect())
}

impl IndexState {
    /// Deploy metadata and totals for a ticker.
    pub fn ticker_info(&self, tick: &str) -> Option<&TickerInfo> {
        self.ticker(tick)
    }

    /// Holders of a ticker, sorted by overall balance descending,
    /// stable on script descending.
    pub fn ticker_holders(&self, tick: &str, start: usize, limit: usize) -> (usize, Vec<HolderRow>) {
        let key = tick_key(tick);
        let mut rows: Vec<HolderRow> = self
            .balances
            .iter()
            .filter(|((t, _), b)| *t == key && !b.is_empty())
            .map(|((_, script), b)| HolderRow {
                pk_script: script.clone(),
                overall: b.overall(),
                available: b.available.clone(),
                available_safe: b.available_safe.clone(),
                transferable: b.transferable.clone(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.overall
                .cmp(&a.overall)
                .then_with(|| b.pk_script.cmp(&a.pk_script))
        });
        page(rows, start, limit)
    }

    /// Ticker status listing with filtering and sorting.
    ///
    /// `filter` is a case-insensitive substring match on the name;
    /// `complete` restricts to fully-minted (or not-yet-minted-out)
    /// tickers.
    pub fn status(
        &self,
        filter: Option<&str>,
        complete: Option<bool>,
        sort_by: StatusSort,
        start: usize,
        limit: usize,
    ) -> (usize, Vec<&TickerInfo>) {
        let needle = filter.map(|f| f.to_lowercase());
        let mut rows: Vec<&TickerInfo> = self
            .tickers
            .iter()
            .filter(|(key, info)| {
                if let Some(n) = &needle {
                    if !key.contains(n.as_str()) {
                        return false;
                    }
                }
                match complete {
                    Some(want) => info.is_complete() == want,
                    None => true,
                }
            })
            .map(|(_, info)| info)
            .collect();

        match sort_by {
            StatusSort::Holders => {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for ((t, _), b) in &self.balances {
                    if !b.is_empty() {
                        *counts.entry(t.as_str()).or_default() += 1;
                    }
                }
                rows.sort_by(|a, b| {
                    let ca = counts.get(tick_key(&a.ticker).as_str()).copied().unwrap_or(0);
                    let cb = counts.get(tick_key(&b.ticker).as_str()).copied().unwrap_or(0);
                    cb.cmp(&ca).then_with(|| a.ticker.cmp(&b.ticker))
                });
            }
            StatusSort::Deploy => rows.sort_by(|a, b| {
                b.deploy_height
                    .cmp(&a.deploy_height)
                    .then_with(|| b.inscription_number.cmp(&a.inscription_number))
            }),
            StatusSort::Minted => rows.sort_by(|a, b| {
                value_cmp(&b.total_minted, &a.total_minted).then_with(|| a.ticker.cmp(&b.ticker))
            }),
            StatusSort::Transactions => rows.sort_by(|a, b| {
                b.history
                    .len()
                    .cmp(&a.history.len())
                    .then_with(|| a.ticker.cmp(&b.ticker))
            }),
        }
        page(rows, start, limit)
    }

    /// All history records at one height, bounded through the
    /// first-index-by-height map.
    pub fn all_history_by_height(
        &self,
        height: u32,
        start: usize,
        limit: usize,
    ) -> (usize, Vec<HistoryRecord>) {
        let range = self.history.indices_at_height(height);
        let records: Vec<HistoryRecord> = range
            .filter_map(|i| self.history.get(i))
            .collect();
        page(records, start, limit)
    }

    /// History of one address across all tickers, newest first.
    pub fn history_by_user(
        &self,
        pk_script: &[u8],
        start: usize,
        limit: usize,
    ) -> (usize, Vec<HistoryRecord>) {
        let indices = match self.user_history.get(pk_script) {
            Some(list) => list,
            None => return (0, Vec::new()),
        };
        let records: Vec<HistoryRecord> = indices
            .iter()
            .rev()
            .filter_map(|&i| self.history.get(i))
            .collect();
        page(records, start, limit)
    }

    /// History of one ticker, optionally restricted to a per-kind
    /// sublist and to records at or below a height. Newest first.
    pub fn ticker_history(
        &self,
        kind: Option<TickerHistoryKind>,
        tick: &str,
        height: Option<u32>,
        start: usize,
        limit: usize,
    ) -> (usize, Vec<HistoryRecord>) {
        let info = match self.ticker(tick) {
            Some(info) => info,
            None => return (0, Vec::new()),
        };
        let indices = match kind {
            None => &info.history,
            Some(TickerHistoryKind::Mint) => &info.history_mint,
            Some(TickerHistoryKind::InscribeTransfer) => &info.history_inscribe_transfer,
            Some(TickerHistoryKind::Transfer) => &info.history_transfer,
        };
        let records: Vec<HistoryRecord> = indices
            .iter()
            .rev()
            .filter(|&&i| match height {
                Some(h) => self.history.height_of(i).map(|rh| rh <= h).unwrap_or(false),
                None => true,
            })
            .filter_map(|&i| self.history.get(i))
            .collect();
        page(records, start, limit)
    }

    /// Balance summary of one address, sorted by overall descending.
    pub fn summary_by_address(
        &self,
        pk_script: &[u8],
        start: usize,
        limit: usize,
    ) -> (usize, Vec<AddressSummaryRow>) {
        let mut rows: Vec<AddressSummaryRow> = self
            .balances
            .iter()
            .filter(|((_, script), _)| script.as_slice() == pk_script)
            .map(|((key, _), b)| AddressSummaryRow {
                tick: b.tick.clone(),
                decimal: self.tickers.get(key).map(|t| t.decimal).unwrap_or(18),
                overall: b.overall(),
                available: b.available.clone(),
                available_safe: b.available_safe.clone(),
                transferable: b.transferable.clone(),
            })
            .collect();
        rows.sort_by(|a, b| value_cmp(&b.overall, &a.overall).then_with(|| a.tick.cmp(&b.tick)));
        page(rows, start, limit)
    }

    /// Balance summary of one address at a past height, reconstructed
    /// from the last history record at or below that height.
    pub fn summary_by_address_at_height(
        &self,
        pk_script: &[u8],
        height: u32,
        start: usize,
        limit: usize,
    ) -> (usize, Vec<AddressSummaryAtHeightRow>) {
        let indices = match self.user_history.get(pk_script) {
            Some(list) => list,
            None => return (0, Vec::new()),
        };
        // latest record per ticker at or below the height; indices are
        // append-ordered, so later entries overwrite earlier ones
        let mut latest: HashMap<String, HistoryRecord> = HashMap::new();
        for &i in indices {
            match self.history.height_of(i) {
                Some(h) if h <= height => {}
                _ => continue,
            }
            if let Some(record) = self.history.get(i) {
                latest.insert(tick_key(&record.tick), record);
            }
        }
        let mut rows: Vec<AddressSummaryAtHeightRow> = latest
            .into_values()
            .map(|record| AddressSummaryAtHeightRow {
                tick: record.tick,
                overall: record.overall_balance,
                available: record.available_balance,
                transferable: record.transferable_balance,
            })
            .collect();
        rows.sort_by(|a, b| a.tick.cmp(&b.tick));
        page(rows, start, limit)
    }

    /// Module history with optional kind and height-range filters,
    /// paginated by cursor in append order.
    pub fn module_history(
        &self,
        module_id: &str,
        kind: Option<ModuleHistoryType>,
        height_start: Option<u32>,
        height_end: Option<u32>,
        cursor: usize,
        size: usize,
    ) -> (usize, Vec<ModuleHistoryRecord>) {
        let module = match self.modules.get(module_id) {
            Some(m) => m,
            None => return (0, Vec::new()),
        };
        let records: Vec<ModuleHistoryRecord> = module
            .history
            .iter()
            .filter(|r| kind.map(|k| r.kind == k).unwrap_or(true))
            .filter(|r| height_start.map(|h| r.height >= h).unwrap_or(true))
            .filter(|r| height_end.map(|h| r.height <= h).unwrap_or(true))
            .cloned()
            .collect();
        page(records, cursor, size)
    }

    /// Module-local balance of one (address, ticker) pair.
    pub fn module_ticker_info_by_address(
        &self,
        pk_script: &[u8],
        module_id: &str,
        tick: &str,
    ) -> Option<ModuleTokenBalance> {
        self.modules
            .get(module_id)?
            .balance(tick, pk_script)
            .cloned()
    }

    /// Verify a commit chain tail against a sandboxed replay.
    pub fn verify_swap_commit(
        &self,
        module_id: &str,
        commits: &[String],
        results: &[ResultCheck],
    ) -> CommitVerification {
        verifier::verify_swap_commit(self, module_id, commits, results)
    }
}
