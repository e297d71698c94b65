//! Cherry-pick snapshots.
//!
//! The commit verifier replays batches against a detached value-copy of
//! the relevant state subset. Nothing in the snapshot aliases live
//! state: decimals, pending maps, and pool balances are all cloned.

use std::collections::HashSet;

use ordex_core::{tick_key, PkScript};

use crate::state::{IndexState, ModuleState};

/// The subset of state a verification run needs.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    /// User scripts.
    pub users: HashSet<PkScript>,
    /// Lowercase ticker keys.
    pub ticks: HashSet<String>,
    /// Canonical pool pair names.
    pub pools: HashSet<String>,
}

impl Selection {
    /// Add a ticker by any-case name.
    pub fn add_tick(&mut self, tick: &str) {
        self.ticks.insert(tick_key(tick));
    }

    /// Add a pool pair and both of its tickers.
    pub fn add_pool(&mut self, pair: &str) {
        self.pools.insert(pair.to_string());
        if let Some((a, b)) = ordex_core::split_pair_name(pair) {
            self.add_tick(a);
            self.add_tick(b);
        }
    }
}

/// Build a detached snapshot of `module_id` restricted to the selection.
///
/// Returns `None` when the module does not exist. The snapshot is
/// deterministic: identical live state and selection produce an
/// identical value.
pub fn cherry_pick(state: &IndexState, module_id: &str, sel: &Selection) -> Option<IndexState> {
    let module = state.modules.get(module_id)?;

    let mut snapshot = IndexState::new(state.config.clone());
    snapshot.best_height = state.best_height;

    for tick in &sel.ticks {
        if let Some(info) = state.tickers.get(tick) {
            snapshot.tickers.insert(tick.clone(), info.clone());
        }
    }

    let mut picked = ModuleState::new(module.info.clone());
    picked.chain_head = module.chain_head.clone();
    picked.commit_connected = module.commit_connected.clone();
    picked.commit_invalid = module.commit_invalid.clone();

    for tick in &sel.ticks {
        for user in &sel.users {
            if let Some(balance) = module.balances.get(&(tick.clone(), user.clone())) {
                picked
                    .balances
                    .insert((tick.clone(), user.clone()), balance.clone());
            }
        }
        if let Some(ledger) = module.cond_state.get(tick) {
            picked.cond_state.insert(tick.clone(), ledger.clone());
        }
    }

    for pair in &sel.pools {
        if let Some(pool) = module.pools.get(pair) {
            picked.pools.insert(pair.clone(), pool.clone());
        }
        for user in &sel.users {
            if let Some(lp) = module.user_lp.get(&(pair.clone(), user.clone())) {
                picked.user_lp.insert((pair.clone(), user.clone()), lp.clone());
            }
        }
    }

    snapshot.modules.insert(module_id.to_string(), picked);
    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::state_with_module;
    use ordex_core::Decimal;

    #[test]
    fn test_cherry_pick_is_value_copy() {
        let (mut state, id) = state_with_module();
        state
            .modules
            .get_mut(&id)
            .unwrap()
            .balance_mut("ordi", 18, &vec![0x61])
            .swap_account = Decimal::parse("1000", 18).unwrap();

        let mut sel = Selection::default();
        sel.add_tick("ordi");
        sel.users.insert(vec![0x61]);

        let mut snapshot = cherry_pick(&state, &id, &sel).unwrap();
        // mutate the snapshot and verify live state is untouched
        snapshot
            .modules
            .get_mut(&id)
            .unwrap()
            .balance_mut("ordi", 18, &vec![0x61])
            .swap_account = Decimal::zero(18);

        assert_eq!(
            state
                .modules
                .get(&id)
                .unwrap()
                .balance("ordi", &[0x61])
                .unwrap()
                .swap_account
                .to_string(),
            "1000"
        );
    }

    #[test]
    fn test_cherry_pick_restricts_to_selection() {
        let (mut state, id) = state_with_module();
        {
            let module = state.modules.get_mut(&id).unwrap();
            module.balance_mut("ordi", 18, &vec![0x61]).swap_account =
                Decimal::parse("1", 18).unwrap();
            module.balance_mut("ordi", 18, &vec![0x62]).swap_account =
                Decimal::parse("2", 18).unwrap();
        }

        let mut sel = Selection::default();
        sel.add_tick("ordi");
        sel.users.insert(vec![0x61]);

        let snapshot = cherry_pick(&state, &id, &sel).unwrap();
        let picked = snapshot.modules.get(&id).unwrap();
        assert!(picked.balance("ordi", &[0x61]).is_some());
        assert!(picked.balance("ordi", &[0x62]).is_none());
    }

    #[test]
    fn test_cherry_pick_missing_module() {
        let (state, _) = state_with_module();
        assert!(cherry_pick(&state, "missing", &Selection::default()).is_none());
    }

    #[test]
    fn test_selection_pool_pulls_ticks() {
        let mut sel = Selection::default();
        sel.add_pool("ordi/sats");
        assert!(sel.ticks.contains("ordi"));
        assert!(sel.ticks.contains("sats"));
    }
}
