//! Approve handlers: reveal and first move.

use std::cmp::Ordering;

use ordex_core::payload::ModuleOpPayload;
use ordex_core::{
    ApproveInfo, InscriptionEvent, ModuleHistoryRecord, ModuleHistoryType,
};

use crate::error::{HandlerResult, Outcome, ProtocolError};
use crate::handlers::{resolve_receiver, validate_module_op};
use crate::state::IndexState;

/// Process a `("brc20-swap", "approve")` reveal: register the pending
/// approve. Balances move only on the first move of the inscription.
pub fn process_inscribe_approve(
    state: &mut IndexState,
    event: &InscriptionEvent,
    payload: &ModuleOpPayload,
) -> HandlerResult {
    let (module_id, tick, _precision, amount) = validate_module_op(state, payload)?;

    state.pending_approves.insert(
        event.create_key,
        ApproveInfo {
            module: module_id.clone(),
            tick: tick.clone(),
            amount: amount.clone(),
            owner: event.pk_script.clone(),
            inscription_id: event.inscription_id.clone(),
            height: event.height,
        },
    );

    let module = state.modules.get_mut(&module_id).expect("module validated");
    module.history.push(ModuleHistoryRecord {
        kind: ModuleHistoryType::InscribeApprove,
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

/// Process the first move of an approve inscription: debit the
/// inscriber's approveable balance, credit the receiver's swap account.
///
/// An insufficient approveable balance marks the approve invalid with no
/// balance change.
pub fn process_approve_move(
    state: &mut IndexState,
    event: &InscriptionEvent,
    info: &ApproveInfo,
) -> HandlerResult {
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

    let owner_balance = module.balance_mut(&info.tick, precision, &info.owner);
    let have = owner_balance.approveable.to_string();
    let valid = owner_balance.approveable.cmp(&info.amount) != Ordering::Less;
    if valid {
        owner_balance.approveable = owner_balance.approveable.sub(&info.amount);
        owner_balance.update_height = event.height;
        let receiver_balance = module.balance_mut(&info.tick, precision, &receiver);
        receiver_balance.swap_account = receiver_balance.swap_account.add(&info.amount);
        receiver_balance.update_height = event.height;
    }

    module.history.push(ModuleHistoryRecord {
        kind: ModuleHistoryType::Approve,
        valid,
        tick: info.tick.clone(),
        amount: info.amount.to_string(),
        inscription_id: info.inscription_id.clone(),
        from: info.owner.clone(),
        to: receiver,
        height: event.height,
        tx_index: event.tx_index,
    });
    module.update_height = event.height;

    if valid {
        Ok(Outcome::Applied)
    } else {
        Err(ProtocolError::ApproveInsufficient {
            tick: info.tick.clone(),
            approveable: have,
            needed: info.amount.to_string(),
        })
    }
}
