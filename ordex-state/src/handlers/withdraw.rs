//! Module withdraw handlers: reveal and first move.

use std::cmp::Ordering;

use ordex_core::payload::ModuleOpPayload;
use ordex_core::{
    is_burn, tick_key, Decimal, HistoryRecord, HistoryType, InscriptionEvent, ModuleHistoryRecord,
    ModuleHistoryType, WithdrawInfo,
};

use crate::error::{HandlerResult, Outcome, ProtocolError};
use crate::handlers::{balance_snapshot, empty_snapshot, resolve_receiver, validate_module_op};
use crate::state::IndexState;

/// Process a `("brc20-module", "withdraw")` reveal: queue the amount in
/// the inscriber's ready-to-withdraw ledger.
pub fn process_inscribe_withdraw(
    state: &mut IndexState,
    event: &InscriptionEvent,
    payload: &ModuleOpPayload,
) -> HandlerResult {
    if event.height < state.config.swap_withdraw_activation_height {
        return Err(ProtocolError::WithdrawNotActive {
            height: event.height,
        });
    }
    let (module_id, tick, precision, amount) = validate_module_op(state, payload)?;

    state.pending_withdraws.insert(
        event.create_key,
        WithdrawInfo {
            module: module_id.clone(),
            tick: tick.clone(),
            amount: amount.clone(),
            owner: event.pk_script.clone(),
            inscription_id: event.inscription_id.clone(),
            height: event.height,
        },
    );

    let module = state.modules.get_mut(&module_id).expect("module validated");
    let balance = module.balance_mut(&tick, precision, &event.pk_script);
    balance.ready_to_withdraw = balance.ready_to_withdraw.add(&amount);
    balance
        .ready_to_withdraw_map
        .insert(event.create_key, amount.clone());
    balance.update_height = event.height;

    module.history.push(ModuleHistoryRecord {
        kind: ModuleHistoryType::InscribeWithdraw,
        valid: true,
        tick,
        amount: amount.to_string(),
        inscription_id: event.inscription_id.clone(),
        from: event.pk_script.clone(),
        to: event.pk_script.clone(),
        height: event.height,
        tx_index: event.tx_index,
    });
    module.update_height = event.height;

    Ok(Outcome::Applied)
}

/// Process the first move of a withdraw inscription.
///
/// The ready-to-withdraw ledger is decremented unconditionally; only
/// then is the module-level available balance checked. An insufficient
/// balance appends invalid history and changes nothing else.
pub fn process_withdraw_move(
    state: &mut IndexState,
    event: &InscriptionEvent,
    info: &WithdrawInfo,
) -> HandlerResult {
    let key = tick_key(&info.tick);
    let precision = match state.tickers.get(&key) {
        Some(t) => t.decimal as u32,
        None => {
            return Err(ProtocolError::TickerNotFound {
                tick: info.tick.clone(),
            })
        }
    };
    let module = state
        .modules
        .get_mut(&info.module)
        .ok_or_else(|| ProtocolError::ModuleNotFound {
            module: info.module.clone(),
        })?;

    let amount = info.amount.clone();
    let receiver = resolve_receiver(event, &info.owner);

    let from_balance = module.balance_mut(&info.tick, precision, &info.owner);
    if !from_balance
        .ready_to_withdraw_map
        .contains_key(&event.create_key)
    {
        return Err(ProtocolError::WithdrawDuplicate);
    }

    // the queued amount is released whether or not the withdraw settles
    from_balance.ready_to_withdraw = from_balance.ready_to_withdraw.sub(&amount);
    from_balance.ready_to_withdraw_map.remove(&event.create_key);
    from_balance.update_height = event.height;

    let have = from_balance.available.to_string();
    let valid = from_balance.available.cmp(&amount) != Ordering::Less;

    module.history.push(ModuleHistoryRecord {
        kind: ModuleHistoryType::Withdraw,
        valid,
        tick: info.tick.clone(),
        amount: amount.to_string(),
        inscription_id: info.inscription_id.clone(),
        from: info.owner.clone(),
        to: receiver.clone(),
        height: event.height,
        tx_index: event.tx_index,
    });
    module.update_height = event.height;

    if !valid {
        module.history.push(ModuleHistoryRecord {
            kind: ModuleHistoryType::WithdrawFrom,
            valid: false,
            tick: info.tick.clone(),
            amount: amount.to_string(),
            inscription_id: info.inscription_id.clone(),
            from: info.owner.clone(),
            to: receiver,
            height: event.height,
            tx_index: event.tx_index,
        });
        return Err(ProtocolError::WithdrawInsufficient {
            tick: info.tick.clone(),
            available: have,
            needed: amount.to_string(),
        });
    }

    // debit the module-level balance
    let from_balance = module.balance_mut(&info.tick, precision, &info.owner);
    from_balance.available = from_balance.available.sub(&amount);
    if from_balance.available_safe.cmp(&amount) == Ordering::Less {
        from_balance.available_safe = Decimal::zero(precision);
    } else {
        from_balance.available_safe = from_balance.available_safe.sub(&amount);
    }
    module.history.push(ModuleHistoryRecord {
        kind: ModuleHistoryType::WithdrawFrom,
        valid: true,
        tick: info.tick.clone(),
        amount: amount.to_string(),
        inscription_id: info.inscription_id.clone(),
        from: info.owner.clone(),
        to: receiver.clone(),
        height: event.height,
        tx_index: event.tx_index,
    });

    // credit the main (non-module) balance of the receiver
    let receiver_snapshot = if is_burn(&receiver) {
        let ticker = state.tickers.get_mut(&key).expect("ticker checked above");
        ticker.burned = ticker.burned.add(&amount);
        ticker.update_height = event.height;
        empty_snapshot()
    } else {
        let balance = state.balance_mut(&info.tick, &receiver);
        balance.available = balance.available.add(&amount);
        if event.block_time > 0 {
            balance.available_safe = balance.available_safe.add(&amount);
        }
        balance.update_height = event.height;
        balance_snapshot(balance)
    };

    let (overall, available, transferable) = receiver_snapshot;
    state.push_history(HistoryRecord {
        kind: HistoryType::Withdraw,
        valid: true,
        tick: info.tick.clone(),
        amount: amount.to_string(),
        inscription_id: info.inscription_id.clone(),
        inscription_number: event.inscription_number,
        from: info.owner.clone(),
        to: receiver,
        satoshi: event.satoshi,
        height: event.height,
        tx_index: event.tx_index,
        block_time: event.block_time,
        overall_balance: overall,
        available_balance: available,
        transferable_balance: transferable,
    });

    state
        .valid_withdraws
        .insert(info.inscription_id.clone(), event.height);

    Ok(Outcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{creation_event, move_event, state_with_module};

    fn op_payload(module: &str, amt: &str) -> ModuleOpPayload {
        ModuleOpPayload {
            module: module.into(),
            tick: "ordi".into(),
            amt: amt.into(),
        }
    }

    fn fund_module_available(state: &mut IndexState, id: &str, who: u8, amount: &str) {
        let balance = state
            .modules
            .get_mut(id)
            .unwrap()
            .balance_mut("ordi", 18, &vec![who]);
        balance.available = Decimal::parse(amount, 18).unwrap();
        balance.available_safe = Decimal::parse(amount, 18).unwrap();
    }

    #[test]
    fn test_inscribe_withdraw_below_activation_rejected() {
        let (mut state, id) = state_with_module();
        let mut event = creation_event(2, 0, vec![0x51], b"{}".to_vec());
        event.height = state.config.swap_withdraw_activation_height - 1;
        assert!(matches!(
            process_inscribe_withdraw(&mut state, &event, &op_payload(&id, "100")),
            Err(ProtocolError::WithdrawNotActive { .. })
        ));
    }

    #[test]
    fn test_withdraw_path() {
        let (mut state, id) = state_with_module();
        fund_module_available(&mut state, &id, 0x51, "500");
        let height = state.config.swap_withdraw_activation_height;

        let created = creation_event(height, 0, vec![0x51], b"{}".to_vec());
        process_inscribe_withdraw(&mut state, &created, &op_payload(&id, "300")).unwrap();
        {
            let module = state.modules.get(&id).unwrap();
            let b = module.balance("ordi", &[0x51]).unwrap();
            assert_eq!(b.ready_to_withdraw.to_string(), "300");
            assert_eq!(b.ready_to_withdraw_map.len(), 1);
        }

        let info = state.pending_withdraws.remove(&created.create_key).unwrap();
        let mv = move_event(&created, height + 1, 0, 1, vec![0x52], 330);
        process_withdraw_move(&mut state, &mv, &info).unwrap();

        let module = state.modules.get(&id).unwrap();
        let b = module.balance("ordi", &[0x51]).unwrap();
        assert_eq!(b.available.to_string(), "200");
        assert_eq!(b.available_safe.to_string(), "200");
        assert!(b.ready_to_withdraw.is_zero());
        assert!(b.ready_to_withdraw_map.is_empty());

        // receiver's main balance credited
        let main = state.balance("ordi", &[0x52]).unwrap();
        assert_eq!(main.available.to_string(), "300");

        // published into the valid-withdraw index
        assert_eq!(
            state.valid_withdraws.get(&info.inscription_id),
            Some(&(height + 1))
        );
    }

    #[test]
    fn test_withdraw_second_move_is_dup() {
        let (mut state, id) = state_with_module();
        fund_module_available(&mut state, &id, 0x51, "500");
        let height = state.config.swap_withdraw_activation_height;

        let created = creation_event(height, 0, vec![0x51], b"{}".to_vec());
        process_inscribe_withdraw(&mut state, &created, &op_payload(&id, "300")).unwrap();
        let info = state.pending_withdraws.remove(&created.create_key).unwrap();

        let mv = move_event(&created, height + 1, 0, 1, vec![0x52], 330);
        process_withdraw_move(&mut state, &mv, &info).unwrap();

        // replaying the move hits the dup guard and changes nothing
        let mv2 = move_event(&created, height + 2, 0, 2, vec![0x52], 330);
        assert!(matches!(
            process_withdraw_move(&mut state, &mv2, &info),
            Err(ProtocolError::WithdrawDuplicate)
        ));
        assert_eq!(
            state.balance("ordi", &[0x52]).unwrap().available.to_string(),
            "300"
        );
    }

    #[test]
    fn test_withdraw_insufficient_still_releases_queue() {
        let (mut state, id) = state_with_module();
        fund_module_available(&mut state, &id, 0x51, "100");
        let height = state.config.swap_withdraw_activation_height;

        let created = creation_event(height, 0, vec![0x51], b"{}".to_vec());
        process_inscribe_withdraw(&mut state, &created, &op_payload(&id, "300")).unwrap();
        let info = state.pending_withdraws.remove(&created.create_key).unwrap();

        let mv = move_event(&created, height + 1, 0, 1, vec![0x52], 330);
        assert!(matches!(
            process_withdraw_move(&mut state, &mv, &info),
            Err(ProtocolError::WithdrawInsufficient { .. })
        ));

        let module = state.modules.get(&id).unwrap();
        let b = module.balance("ordi", &[0x51]).unwrap();
        // the queued amount was released even though the withdraw failed
        assert!(b.ready_to_withdraw.is_zero());
        // the available balance is untouched
        assert_eq!(b.available.to_string(), "100");
        // invalid from-history was appended
        let last = module.history.last().unwrap();
        assert_eq!(last.kind, ModuleHistoryType::WithdrawFrom);
        assert!(!last.valid);
        // nothing reached the receiver
        assert!(state.balance("ordi", &[0x52]).is_none());
    }

    #[test]
    fn test_withdraw_burn_receiver() {
        let (mut state, id) = state_with_module();
        fund_module_available(&mut state, &id, 0x51, "500");
        let height = state.config.swap_withdraw_activation_height;

        let created = creation_event(height, 0, vec![0x51], b"{}".to_vec());
        process_inscribe_withdraw(&mut state, &created, &op_payload(&id, "300")).unwrap();
        let info = state.pending_withdraws.remove(&created.create_key).unwrap();

        let mv = move_event(&created, height + 1, 0, 1, vec![0x6a], 330);
        process_withdraw_move(&mut state, &mv, &info).unwrap();

        assert_eq!(state.ticker("ordi").unwrap().burned.to_string(), "300");
        assert!(state.balance("ordi", &[0x6a]).is_none());
    }
}
