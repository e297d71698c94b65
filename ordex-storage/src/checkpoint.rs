//! Per-block checkpoints and latest-height restore.
//!
//! `save` writes the height-scoped deltas of every logical table in one
//! atomic batch; `restore` rebuilds the live state by taking the
//! highest-height row per logical key. The resume point is the highest
//! height seen in `user_balance`.

use std::collections::HashMap;

use ordex_core::serialization::{deserialize, serialize};
use ordex_core::{
    tick_key, ApproveInfo, CommitInfo, CondApproveInfo, CondStateBalance, EventKey,
    ModuleHistoryRecord, PendingTransfer, PoolBalance, WithdrawInfo,
};
use ordex_state::{IndexConfig, IndexState, ModuleState};

use crate::error::StorageError;
use crate::keys::{parse_row_key, row_key, table, table_prefix};
use crate::kv::{KvBackend, WriteBatch};
use crate::tables::{CommitChainRow, ModuleBalanceRow, ModuleInfoRow, TickerRow, UserBalanceRow};

/// Checkpoint store over any KV backend.
pub struct CheckpointStore<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> CheckpointStore<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Borrow the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Write the deltas of one block as a single atomic batch.
    ///
    /// Returns the number of rows written.
    pub fn save(&self, height: u32, state: &IndexState) -> Result<usize, StorageError> {
        let mut batch = WriteBatch::new();

        for (key, info) in &state.tickers {
            if info.update_height == height {
                let row = TickerRow::from(info);
                batch.put(
                    row_key(table::TICKER_INFO, key.as_bytes(), height),
                    serialize(&row)?,
                );
            }
        }

        for ((tick, script), balance) in &state.balances {
            if balance.update_height == height {
                let id = serialize(&(tick, script))?;
                let row = UserBalanceRow::from(balance);
                batch.put(row_key(table::USER_BALANCE, &id, height), serialize(&row)?);
            }
        }

        self.save_pending_sets(&mut batch, height, state)?;
        self.save_modules(&mut batch, height, state)?;

        for (inscription_id, h) in &state.valid_withdraws {
            if *h == height {
                batch.put(
                    row_key(table::MODULE_WITHDRAWALS, inscription_id.as_bytes(), height),
                    serialize(h)?,
                );
            }
        }

        let rows = batch.len();
        self.backend.write_batch(batch)?;
        self.backend.flush()?;
        Ok(rows)
    }

    fn save_pending_sets(
        &self,
        batch: &mut WriteBatch,
        height: u32,
        state: &IndexState,
    ) -> Result<(), StorageError> {
        // consumed this block
        for (key, h) in &state.transfer_removed {
            batch.put(row_key(table::TRANSFER_STATE, key, height), serialize(h)?);
        }
        for (key, h) in &state.approve_removed {
            batch.put(row_key(table::SWAP_APPROVE_STATE, key, height), serialize(h)?);
        }
        for (key, h) in &state.cond_approve_removed {
            batch.put(
                row_key(table::SWAP_COND_APPROVE_STATE, key, height),
                serialize(h)?,
            );
        }
        for (key, h) in &state.withdraw_removed {
            batch.put(
                row_key(table::SWAP_WITHDRAW_STATE, key, height),
                serialize(h)?,
            );
        }
        for (key, h) in &state.commit_removed {
            batch.put(row_key(table::SWAP_COMMIT_STATE, key, height), serialize(h)?);
        }

        // registered this block
        for (key, pending) in &state.pending_transfers {
            if pending.height == height {
                batch.put(row_key(table::VALID_TRANSFER, key, height), serialize(pending)?);
            }
        }
        for (key, info) in &state.pending_approves {
            if info.height == height {
                batch.put(row_key(table::VALID_APPROVE, key, height), serialize(info)?);
            }
        }
        for (key, info) in &state.pending_cond_approves {
            // settled entries get rewritten so the zero balance persists
            if info.height == height || state.cond_approve_removed.contains_key(key) {
                batch.put(row_key(table::VALID_COND_APPROVE, key, height), serialize(info)?);
            }
        }
        for (key, info) in &state.pending_withdraws {
            if info.height == height {
                batch.put(row_key(table::VALID_WITHDRAW, key, height), serialize(info)?);
            }
        }
        for (key, info) in &state.pending_commits {
            if info.height == height {
                batch.put(row_key(table::VALID_COMMIT, key, height), serialize(info)?);
            }
        }
        Ok(())
    }

    fn save_modules(
        &self,
        batch: &mut WriteBatch,
        height: u32,
        state: &IndexState,
    ) -> Result<(), StorageError> {
        for (module_id, module) in &state.modules {
            if module.update_height != height {
                continue;
            }
            let info_row = ModuleInfoRow {
                info: module.info.clone(),
                chain_head: module.chain_head.clone(),
            };
            batch.put(
                row_key(table::SWAP_INFO, module_id.as_bytes(), height),
                serialize(&info_row)?,
            );

            for (index, record) in module.history.iter().enumerate() {
                if record.height == height {
                    let id = serialize(&(module_id, index as u64))?;
                    batch.put(row_key(table::SWAP_HISTORY, &id, height), serialize(record)?);
                }
            }

            for ((tick, script), balance) in &module.balances {
                if balance.update_height == height {
                    let id = serialize(&(module_id, tick, script))?;
                    let row = ModuleBalanceRow::from(balance);
                    batch.put(
                        row_key(table::SWAP_USER_BALANCE, &id, height),
                        serialize(&row)?,
                    );
                }
            }

            for (pair, pool) in &module.pools {
                if pool.update_height == height {
                    let id = serialize(&(module_id, pair))?;
                    batch.put(
                        row_key(table::SWAP_POOL_BALANCE, &id, height),
                        serialize(pool)?,
                    );
                }
            }

            // LP rows and chain rows carry no per-row height; rewrite
            // the touched module's full set
            for ((pair, script), lp) in &module.user_lp {
                let id = serialize(&(module_id, pair, script))?;
                batch.put(
                    row_key(table::SWAP_USER_LP_BALANCE, &id, height),
                    serialize(lp)?,
                );
            }

            for commit_id in &module.commit_connected {
                let id = serialize(&(module_id, commit_id))?;
                let row = CommitChainRow {
                    commit_id: commit_id.clone(),
                    valid: true,
                    connected: true,
                    pending: None,
                };
                batch.put(row_key(table::SWAP_COMMIT_CHAIN, &id, height), serialize(&row)?);
            }
            for (commit_id, info) in &module.commit_pending {
                let id = serialize(&(module_id, commit_id))?;
                let row = CommitChainRow {
                    commit_id: commit_id.clone(),
                    valid: true,
                    connected: false,
                    pending: Some(info.clone()),
                };
                batch.put(row_key(table::SWAP_COMMIT_CHAIN, &id, height), serialize(&row)?);
            }
            for commit_id in &module.commit_invalid {
                let id = serialize(&(module_id, commit_id))?;
                let row = CommitChainRow {
                    commit_id: commit_id.clone(),
                    valid: false,
                    connected: false,
                    pending: None,
                };
                batch.put(row_key(table::SWAP_COMMIT_CHAIN, &id, height), serialize(&row)?);
            }

            for (tick, ledger) in &module.cond_state {
                let id = serialize(&(module_id, tick))?;
                batch.put(
                    row_key(table::SWAP_COND_STATE_BALANCE, &id, height),
                    serialize(ledger)?,
                );
            }
        }
        Ok(())
    }

    /// Highest checkpointed height, from the `user_balance` table.
    pub fn resume_height(&self) -> Result<Option<u32>, StorageError> {
        let prefix = table_prefix(table::USER_BALANCE);
        let mut best: Option<u32> = None;
        for (key, _) in self.backend.prefix_iterator(&prefix)? {
            let (_, height) = parse_row_key(table::USER_BALANCE, &key)?;
            best = Some(best.map_or(height, |b| b.max(height)));
        }
        Ok(best)
    }

    /// Latest row per logical key of one table.
    fn latest_rows(&self, table_name: &str) -> Result<HashMap<Vec<u8>, Vec<u8>>, StorageError> {
        let prefix = table_prefix(table_name);
        let mut latest: HashMap<Vec<u8>, (u32, Vec<u8>)> = HashMap::new();
        for (key, value) in self.backend.prefix_iterator(&prefix)? {
            let (id, height) = parse_row_key(table_name, &key)?;
            match latest.get(id) {
                Some((h, _)) if *h > height => {}
                _ => {
                    latest.insert(id.to_vec(), (height, value));
                }
            }
        }
        Ok(latest
            .into_iter()
            .map(|(id, (_, value))| (id, value))
            .collect())
    }

    /// Rebuild the live state from the latest row per key.
    ///
    /// History (and the per-kind index lists derived from it) is not
    /// persisted; a restored state starts with an empty log.
    pub fn restore(&self, config: IndexConfig) -> Result<IndexState, StorageError> {
        let mut state = IndexState::new(config);

        for (id, value) in self.latest_rows(table::TICKER_INFO)? {
            let row: TickerRow = deserialize(&value)?;
            let key = String::from_utf8(id)
                .map_err(|_| StorageError::InvalidKey("ticker key not utf-8".into()))?;
            state.tickers.insert(key, row.into_info());
        }

        for (_, value) in self.latest_rows(table::USER_BALANCE)? {
            let row: UserBalanceRow = deserialize(&value)?;
            let balance = row.into_balance();
            state
                .balances
                .insert((tick_key(&balance.tick), balance.pk_script.clone()), balance);
        }

        self.restore_pending_sets(&mut state)?;
        self.restore_modules(&mut state)?;

        for (id, value) in self.latest_rows(table::MODULE_WITHDRAWALS)? {
            let height: u32 = deserialize(&value)?;
            let inscription_id = String::from_utf8(id)
                .map_err(|_| StorageError::InvalidKey("withdraw id not utf-8".into()))?;
            state.valid_withdraws.insert(inscription_id, height);
        }

        state.best_height = self.resume_height()?.unwrap_or(0);
        Ok(state)
    }

    fn moved_keys(&self, table_name: &str) -> Result<HashMap<Vec<u8>, ()>, StorageError> {
        Ok(self
            .latest_rows(table_name)?
            .into_keys()
            .map(|k| (k, ()))
            .collect())
    }

    fn restore_pending_sets(&self, state: &mut IndexState) -> Result<(), StorageError> {
        let moved = self.moved_keys(table::TRANSFER_STATE)?;
        for (id, value) in self.latest_rows(table::VALID_TRANSFER)? {
            if moved.contains_key(&id) {
                continue;
            }
            let pending: PendingTransfer = deserialize(&value)?;
            let key: EventKey = id
                .as_slice()
                .try_into()
                .map_err(|_| StorageError::InvalidKey("event key not 12 bytes".into()))?;
            // re-link into the owner's balance row
            if let Some(balance) = state
                .balances
                .get_mut(&(tick_key(&pending.tick), pending.owner.clone()))
            {
                balance.pending_transfers.insert(key, pending.clone());
            }
            state.pending_transfers.insert(key, pending);
        }

        let moved = self.moved_keys(table::SWAP_APPROVE_STATE)?;
        for (id, value) in self.latest_rows(table::VALID_APPROVE)? {
            if moved.contains_key(&id) {
                continue;
            }
            let info: ApproveInfo = deserialize(&value)?;
            let key: EventKey = id
                .as_slice()
                .try_into()
                .map_err(|_| StorageError::InvalidKey("event key not 12 bytes".into()))?;
            state.pending_approves.insert(key, info);
        }

        // settled conditional approves stay restorable: a zero balance
        // marks them settled
        for (id, value) in self.latest_rows(table::VALID_COND_APPROVE)? {
            let info: CondApproveInfo = deserialize(&value)?;
            let key: EventKey = id
                .as_slice()
                .try_into()
                .map_err(|_| StorageError::InvalidKey("event key not 12 bytes".into()))?;
            state.pending_cond_approves.insert(key, info);
        }

        let moved = self.moved_keys(table::SWAP_WITHDRAW_STATE)?;
        for (id, value) in self.latest_rows(table::VALID_WITHDRAW)? {
            if moved.contains_key(&id) {
                continue;
            }
            let info: WithdrawInfo = deserialize(&value)?;
            let key: EventKey = id
                .as_slice()
                .try_into()
                .map_err(|_| StorageError::InvalidKey("event key not 12 bytes".into()))?;
            state.pending_withdraws.insert(key, info);
        }

        let moved = self.moved_keys(table::SWAP_COMMIT_STATE)?;
        for (id, value) in self.latest_rows(table::VALID_COMMIT)? {
            if moved.contains_key(&id) {
                continue;
            }
            let info: CommitInfo = deserialize(&value)?;
            let key: EventKey = id
                .as_slice()
                .try_into()
                .map_err(|_| StorageError::InvalidKey("event key not 12 bytes".into()))?;
            state.pending_commits.insert(key, info);
        }
        Ok(())
    }

    fn restore_modules(&self, state: &mut IndexState) -> Result<(), StorageError> {
        for (id, value) in self.latest_rows(table::SWAP_INFO)? {
            let row: ModuleInfoRow = deserialize(&value)?;
            let module_id = String::from_utf8(id)
                .map_err(|_| StorageError::InvalidKey("module id not utf-8".into()))?;
            let mut module = ModuleState::new(row.info);
            module.chain_head = row.chain_head;
            state.modules.insert(module_id, module);
        }

        for (id, value) in self.latest_rows(table::SWAP_USER_BALANCE)? {
            let (module_id, _tick, _script): (String, String, Vec<u8>) = deserialize(&id)?;
            let row: ModuleBalanceRow = deserialize(&value)?;
            if let Some(module) = state.modules.get_mut(&module_id) {
                let balance = row.into_balance();
                module
                    .balances
                    .insert((tick_key(&balance.tick), balance.pk_script.clone()), balance);
            }
        }

        for (id, value) in self.latest_rows(table::SWAP_POOL_BALANCE)? {
            let (module_id, _pair): (String, String) = deserialize(&id)?;
            let pool: PoolBalance = deserialize(&value)?;
            if let Some(module) = state.modules.get_mut(&module_id) {
                module.pools.insert(pool.pair.clone(), pool);
            }
        }

        for (id, value) in self.latest_rows(table::SWAP_USER_LP_BALANCE)? {
            let (module_id, pair, script): (String, String, Vec<u8>) = deserialize(&id)?;
            let lp: ordex_core::Decimal = deserialize(&value)?;
            if let Some(module) = state.modules.get_mut(&module_id) {
                if !lp.is_zero() {
                    module.user_lp.insert((pair, script), lp);
                }
            }
        }

        for (id, value) in self.latest_rows(table::SWAP_COMMIT_CHAIN)? {
            let (module_id, _commit): (String, String) = deserialize(&id)?;
            let row: CommitChainRow = deserialize(&value)?;
            if let Some(module) = state.modules.get_mut(&module_id) {
                match (row.valid, row.connected) {
                    (true, true) => {
                        module.commit_connected.insert(row.commit_id);
                    }
                    (true, false) => {
                        if let Some(info) = row.pending {
                            module.commit_pending.insert(row.commit_id, info);
                        }
                    }
                    (false, _) => {
                        module.commit_invalid.insert(row.commit_id);
                    }
                }
            }
        }

        for (id, value) in self.latest_rows(table::SWAP_COND_STATE_BALANCE)? {
            let (module_id, tick): (String, String) = deserialize(&id)?;
            let ledger: CondStateBalance = deserialize(&value)?;
            if let Some(module) = state.modules.get_mut(&module_id) {
                module.cond_state.insert(tick, ledger);
            }
        }

        for (id, value) in self.latest_rows(table::SWAP_HISTORY)? {
            let (module_id, index): (String, u64) = deserialize(&id)?;
            let record: ModuleHistoryRecord = deserialize(&value)?;
            if let Some(module) = state.modules.get_mut(&module_id) {
                let index = index as usize;
                if module.history.len() <= index {
                    module.history.resize(
                        index + 1,
                        ModuleHistoryRecord {
                            kind: record.kind,
                            valid: false,
                            tick: String::new(),
                            amount: String::new(),
                            inscription_id: String::new(),
                            from: Vec::new(),
                            to: Vec::new(),
                            height: 0,
                            tx_index: 0,
                        },
                    );
                }
                module.history[index] = record;
            }
        }

        // rebuild per-inscription withdraw queues from the live set
        let pending: Vec<(EventKey, WithdrawInfo)> = state
            .pending_withdraws
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        for (key, info) in pending {
            let precision = match state.ticker(&info.tick) {
                Some(t) => t.decimal as u32,
                None => continue,
            };
            if let Some(module) = state.modules.get_mut(&info.module) {
                let balance = module.balance_mut(&info.tick, precision, &info.owner);
                balance.ready_to_withdraw_map.insert(key, info.amount.clone());
            }
        }
        Ok(())
    }
}
