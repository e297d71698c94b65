//! Conditional-approve handlers: reveal and moves.
//!
//! Unlike a plain approve, a conditional approve stays dispatchable after
//! settling: its pending record keeps a running `balance` that reaches
//! zero on delivery or cancel, and later moves are no-ops. Per-ticker
//! ledger totals (deposit / approve / new-approve / cancel-approve) are
//! tracked on the module.

use std::cmp::Ordering;

use ordex_core::payload::ModuleOpPayload;
use ordex_core::{CondApproveInfo, InscriptionEvent, ModuleHistoryRecord, ModuleHistoryType};

use crate::error::{HandlerResult, Outcome, ProtocolError};
use crate::handlers::{resolve_receiver, validate_module_op};
use crate::state::IndexState;

/// Process a `("brc20-swap", "conditional-approve")` reveal.
pub fn process_inscribe_cond_approve(
    state: &mut IndexState,
    event: &InscriptionEvent,
    payload: &ModuleOpPayload,
) -> HandlerResult {
    let (module_id, tick, precision, amount) = validate_module_op(state, payload)?;

    state.pending_cond_approves.insert(
        event.create_key,
        CondApproveInfo {
            module: module_id.clone(),
            tick: tick.clone(),
            amount: amount.clone(),
            balance: amount.clone(),
            owner: event.pk_script.clone(),
            inscription_id: event.inscription_id.clone(),
            height: event.height,
        },
    );

    let module = state.modules.get_mut(&module_id).expect("module validated");
    let ledger = module.cond_state_mut(&tick, precision);
    ledger.new_approve = ledger.new_approve.add(&amount);
    module.history.push(ModuleHistoryRecord {
        kind: ModuleHistoryType::InscribeConditionalApprove,
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

/// Process a move of a conditional-approve inscription.
///
/// A move back to the owner (or a spend as fee) cancels the remainder to
/// the owner's module available balance; any other destination delivers
/// it to the receiver's swap account. Either way the running balance
/// drops to zero and later moves are no-ops.
pub fn process_cond_approve_move(
    state: &mut IndexState,
    event: &InscriptionEvent,
    key: &ordex_core::EventKey,
) -> HandlerResult {
    let info = match state.pending_cond_approves.get(key) {
        Some(info) => info.clone(),
        None => return Ok(Outcome::Ignored),
    };
    if info.balance.is_zero() {
        // already settled by an earlier move
        return Ok(Outcome::Ignored);
    }

    let precision = match state.ticker(&info.tick) {
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

    let receiver = resolve_receiver(event, &info.owner);
    let cancel = receiver == info.owner;
    let remainder = info.balance.clone();

    let owner_balance = module.balance_mut(&info.tick, precision, &info.owner);
    let have = owner_balance.cond_approveable.to_string();
    let valid = owner_balance.cond_approveable.cmp(&remainder) != Ordering::Less;
    if valid {
        owner_balance.cond_approveable = owner_balance.cond_approveable.sub(&remainder);
        owner_balance.update_height = event.height;
        if cancel {
            let owner_balance = module.balance_mut(&info.tick, precision, &info.owner);
            owner_balance.available = owner_balance.available.add(&remainder);
            let ledger = module.cond_state_mut(&info.tick, precision);
            ledger.cancel_approve = ledger.cancel_approve.add(&remainder);
        } else {
            let receiver_balance = module.balance_mut(&info.tick, precision, &receiver);
            receiver_balance.swap_account = receiver_balance.swap_account.add(&remainder);
            receiver_balance.update_height = event.height;
            let ledger = module.cond_state_mut(&info.tick, precision);
            ledger.approve = ledger.approve.add(&remainder);
        }
    }

    module.history.push(ModuleHistoryRecord {
        kind: ModuleHistoryType::ConditionalApprove,
        valid,
        tick: info.tick.clone(),
        amount: remainder.to_string(),
        inscription_id: info.inscription_id.clone(),
        from: info.owner.clone(),
        to: receiver,
        height: event.height,
        tx_index: event.tx_index,
    });
    module.update_height = event.height;

    if !valid {
        return Err(ProtocolError::ApproveInsufficient {
            tick: info.tick.clone(),
            approveable: have,
            needed: remainder.to_string(),
        });
    }

    // settle the running balance; the record stays for later moves
    let precision_zero = ordex_core::Decimal::zero(precision);
    state
        .pending_cond_approves
        .get_mut(key)
        .expect("record present above")
        .balance = precision_zero;
    state.cond_approve_removed.insert(*key, event.height);

    Ok(Outcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{creation_event, move_event, state_with_module};
    use ordex_core::Decimal;

    fn op_payload(module: &str, amt: &str) -> ModuleOpPayload {
        ModuleOpPayload {
            module: module.into(),
            tick: "ordi".into(),
            amt: amt.into(),
        }
    }

    #[test]
    fn test_inscribe_tracks_new_approve_ledger() {
        let (mut state, id) = state_with_module();
        let event = creation_event(2, 0, vec![0x51], b"{}".to_vec());
        process_inscribe_cond_approve(&mut state, &event, &op_payload(&id, "100")).unwrap();
        let module = state.modules.get(&id).unwrap();
        assert_eq!(
            module.cond_state.get("ordi").unwrap().new_approve.to_string(),
            "100"
        );
        assert!(state.pending_cond_approves.contains_key(&event.create_key));
    }

    #[test]
    fn test_move_delivers_to_receiver() {
        let (mut state, id) = state_with_module();
        state
            .modules
            .get_mut(&id)
            .unwrap()
            .balance_mut("ordi", 18, &vec![0x51])
            .cond_approveable = Decimal::parse("500", 18).unwrap();

        let created = creation_event(2, 0, vec![0x51], b"{}".to_vec());
        process_inscribe_cond_approve(&mut state, &created, &op_payload(&id, "100")).unwrap();

        let mv = move_event(&created, 3, 0, 1, vec![0x54], 330);
        process_cond_approve_move(&mut state, &mv, &created.create_key).unwrap();

        let module = state.modules.get(&id).unwrap();
        assert_eq!(
            module.balance("ordi", &[0x51]).unwrap().cond_approveable.to_string(),
            "400"
        );
        assert_eq!(
            module.balance("ordi", &[0x54]).unwrap().swap_account.to_string(),
            "100"
        );
        assert_eq!(module.cond_state.get("ordi").unwrap().approve.to_string(), "100");

        // a second move is a no-op: the running balance is settled
        let mv2 = move_event(&created, 4, 0, 2, vec![0x55], 330);
        assert_eq!(
            process_cond_approve_move(&mut state, &mv2, &created.create_key).unwrap(),
            Outcome::Ignored
        );
    }

    #[test]
    fn test_move_back_to_owner_cancels() {
        let (mut state, id) = state_with_module();
        state
            .modules
            .get_mut(&id)
            .unwrap()
            .balance_mut("ordi", 18, &vec![0x51])
            .cond_approveable = Decimal::parse("100", 18).unwrap();

        let created = creation_event(2, 0, vec![0x51], b"{}".to_vec());
        process_inscribe_cond_approve(&mut state, &created, &op_payload(&id, "100")).unwrap();

        // spent as fee: refunds to the owner, which cancels
        let mv = move_event(&created, 3, 0, 1, vec![0x99], 0);
        process_cond_approve_move(&mut state, &mv, &created.create_key).unwrap();

        let module = state.modules.get(&id).unwrap();
        let b = module.balance("ordi", &[0x51]).unwrap();
        assert!(b.cond_approveable.is_zero());
        assert_eq!(b.available.to_string(), "100");
        assert_eq!(
            module.cond_state.get("ordi").unwrap().cancel_approve.to_string(),
            "100"
        );
    }

    #[test]
    fn test_move_insufficient_marks_invalid() {
        let (mut state, id) = state_with_module();
        let created = creation_event(2, 0, vec![0x51], b"{}".to_vec());
        process_inscribe_cond_approve(&mut state, &created, &op_payload(&id, "100")).unwrap();

        let mv = move_event(&created, 3, 0, 1, vec![0x54], 330);
        assert!(process_cond_approve_move(&mut state, &mv, &created.create_key).is_err());
        let module = state.modules.get(&id).unwrap();
        assert!(!module.history.last().unwrap().valid);
        // the record keeps its balance and may settle later
        assert_eq!(
            state
                .pending_cond_approves
                .get(&created.create_key)
                .unwrap()
                .balance
                .to_string(),
            "100"
        );
    }
}
