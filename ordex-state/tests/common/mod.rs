//! Shared helpers for acceptance tests.

use std::collections::HashSet;

use ordex_core::{event_key, EventKey, InscriptionEvent, PkScript};
use ordex_state::IndexState;

/// A creation event (reveal) at the given position.
pub fn creation(height: u32, idx: u64, script: PkScript, body: String) -> InscriptionEvent {
    InscriptionEvent {
        is_transfer: false,
        create_key: event_key(height, idx),
        height,
        tx_index: idx as u32,
        sequence: 0,
        sat_offset: 0,
        satoshi: 330,
        pk_script: script,
        inscription_number: (height as i64) * 1000 + idx as i64,
        inscription_id: format!("{:08x}{:04x}i0", height, idx),
        content_body: body.into_bytes(),
        parent: None,
        block_time: 1_700_000_000,
    }
}

/// The move of a previously created inscription.
pub fn movement(
    created: &InscriptionEvent,
    height: u32,
    idx: u64,
    sequence: u32,
    to: PkScript,
    satoshi: u64,
) -> InscriptionEvent {
    InscriptionEvent {
        is_transfer: true,
        create_key: created.create_key,
        height,
        tx_index: idx as u32,
        sequence,
        sat_offset: 0,
        satoshi,
        pk_script: to,
        inscription_number: created.inscription_number,
        inscription_id: created.inscription_id.clone(),
        content_body: Vec::new(),
        parent: None,
        block_time: 1_700_000_000,
    }
}

pub fn deploy_body(tick: &str, max: &str, lim: &str, dec: &str) -> String {
    format!(
        r#"{{"p":"brc-20","op":"deploy","tick":"{}","max":"{}","lim":"{}","dec":"{}"}}"#,
        tick, max, lim, dec
    )
}

pub fn self_mint_deploy_body(tick: &str, max: &str) -> String {
    format!(
        r#"{{"p":"brc-20","op":"deploy","tick":"{}","max":"{}","self_mint":"true"}}"#,
        tick, max
    )
}

pub fn mint_body(tick: &str, amt: &str) -> String {
    format!(
        r#"{{"p":"brc-20","op":"mint","tick":"{}","amt":"{}","pad":"......"}}"#,
        tick, amt
    )
}

pub fn transfer_body(tick: &str, amt: &str) -> String {
    format!(
        r#"{{"p":"brc-20","op":"transfer","tick":"{}","amt":"{}","pad":"..."}}"#,
        tick, amt
    )
}

pub fn module_deploy_body(sequencer: &str, gas_to: &str, gas_tick: &str, fee_rate: &str) -> String {
    format!(
        r#"{{"p":"brc20-module","op":"deploy","name":"swap","init":{{"gas_tick":"{}","swap_fee_rate":"{}","sequencer":"{}","gas_to":"{}"}}}}"#,
        gas_tick, fee_rate, sequencer, gas_to
    )
}

pub fn module_withdraw_body(module: &str, tick: &str, amt: &str) -> String {
    format!(
        r#"{{"p":"brc20-module","op":"withdraw","module":"{}","tick":"{}","amt":"{}"}}"#,
        module, tick, amt
    )
}

/// Check the invariants that must hold after every event (spec-level
/// properties over supply, balances, modules, pools, and pending keys).
pub fn assert_invariants(state: &IndexState) {
    // supply: total minted equals holder balances plus module-held
    // funds plus burned
    for (key, info) in &state.tickers {
        let mut sum = info.burned.clone();
        for ((tick, _), balance) in &state.balances {
            if tick == key {
                sum = sum.add(&balance.overall());
            }
        }
        for module in state.modules.values() {
            for ((tick, _), balance) in &module.balances {
                if tick == key {
                    sum = sum.add(&balance.module_balance());
                }
            }
            for pool in module.pools.values() {
                for (side, tick) in pool.ticks.iter().enumerate() {
                    if tick == key {
                        sum = sum.add(&pool.reserves[side]);
                    }
                }
            }
        }
        assert_eq!(
            sum.cmp(&info.total_minted),
            std::cmp::Ordering::Equal,
            "supply mismatch for {}: holders+burned {} != minted {}",
            key,
            sum,
            info.total_minted
        );
        assert_ne!(
            info.total_minted.cmp(&info.max),
            std::cmp::Ordering::Greater,
            "minted over max for {}",
            key
        );
    }

    // per-holder component balances
    for ((key, script), balance) in &state.balances {
        assert_ne!(
            balance.available_safe.cmp(&balance.available),
            std::cmp::Ordering::Greater,
            "safe > available for {} {:?}",
            key,
            script
        );
        let mut pending_sum = ordex_core::Decimal::zero(balance.transferable.precision());
        for pending in balance.pending_transfers.values() {
            pending_sum = pending_sum.add(&pending.amount);
        }
        assert_eq!(
            pending_sum.cmp(&balance.transferable),
            std::cmp::Ordering::Equal,
            "transferable != pending sum for {} {:?}",
            key,
            script
        );
    }

    // module balances and pools
    for module in state.modules.values() {
        for balance in module.balances.values() {
            let mut ready_sum = ordex_core::Decimal::zero(balance.ready_to_withdraw.precision());
            for amount in balance.ready_to_withdraw_map.values() {
                ready_sum = ready_sum.add(amount);
            }
            assert_eq!(
                ready_sum.cmp(&balance.ready_to_withdraw),
                std::cmp::Ordering::Equal,
                "ready-to-withdraw ledger mismatch"
            );
        }
        for (pair, pool) in &module.pools {
            let mut lp_sum = ordex_core::Decimal::zero(18);
            for ((p, _), lp) in &module.user_lp {
                if p == pair {
                    lp_sum = lp_sum.add(lp);
                }
            }
            assert_eq!(
                lp_sum.cmp(&pool.lp_total),
                std::cmp::Ordering::Equal,
                "lp sum mismatch for {}",
                pair
            );
        }
    }

    // pending keys are unique across all pending maps
    let mut seen: HashSet<EventKey> = HashSet::new();
    let all_keys = state
        .pending_transfers
        .keys()
        .chain(state.pending_approves.keys())
        .chain(state.pending_cond_approves.keys())
        .chain(state.pending_withdraws.keys())
        .chain(state.pending_commits.keys());
    for key in all_keys {
        assert!(seen.insert(*key), "duplicate pending key {:?}", key);
    }
}
