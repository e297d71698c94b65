//! Inscribe-transfer and transfer-move handlers.

use std::cmp::Ordering;

use ordex_core::payload::TransferPayload;
use ordex_core::{
    is_burn, tick_key, Decimal, HistoryRecord, HistoryType, InscriptionEvent, PendingTransfer,
};

use crate::error::{HandlerResult, Outcome, ProtocolError};
use crate::handlers::{balance_snapshot, empty_snapshot, resolve_receiver};
use crate::state::IndexState;

/// Process a `("brc-20", "transfer")` reveal: lock an amount behind a
/// pending transfer inscription.
pub fn process_inscribe_transfer(
    state: &mut IndexState,
    event: &InscriptionEvent,
    payload: &TransferPayload,
) -> HandlerResult {
    let (precision, tick) = {
        let info = state
            .ticker(&payload.tick)
            .ok_or_else(|| ProtocolError::TickerNotFound {
                tick: payload.tick.clone(),
            })?;
        (info.decimal as u32, info.ticker.clone())
    };

    let amount =
        Decimal::parse(&payload.amt, precision).map_err(|_| ProtocolError::AmountInvalid {
            field: "amt",
            value: payload.amt.clone(),
        })?;
    if amount.sign() <= 0 {
        return Err(ProtocolError::AmountOutOfRange {
            value: payload.amt.clone(),
        });
    }

    let balance = state.balance_mut(&tick, &event.pk_script);
    if balance.available.cmp(&amount) == Ordering::Less {
        return Err(ProtocolError::InsufficientAvailable {
            tick,
            available: balance.available.to_string(),
            needed: amount.to_string(),
        });
    }

    let pending = PendingTransfer {
        tick: tick.clone(),
        amount: amount.clone(),
        owner: event.pk_script.clone(),
        height: event.height,
        tx_index: event.tx_index,
        inscription_id: event.inscription_id.clone(),
    };

    balance.available = balance.available.sub(&amount);
    // the safe portion shrinks with available, clamped at zero
    if balance.available_safe.cmp(&amount) == Ordering::Less {
        balance.available_safe = Decimal::zero(precision);
    } else {
        balance.available_safe = balance.available_safe.sub(&amount);
    }
    balance.transferable = balance.transferable.add(&amount);
    balance
        .pending_transfers
        .insert(event.create_key, pending.clone());
    balance.update_height = event.height;
    let (overall, available, transferable) = balance_snapshot(balance);

    state.pending_transfers.insert(event.create_key, pending);

    state.push_history(HistoryRecord {
        kind: HistoryType::InscribeTransfer,
        valid: true,
        tick: payload.tick.clone(),
        amount: amount.to_string(),
        inscription_id: event.inscription_id.clone(),
        inscription_number: event.inscription_number,
        from: Vec::new(),
        to: event.pk_script.clone(),
        satoshi: event.satoshi,
        height: event.height,
        tx_index: event.tx_index,
        block_time: event.block_time,
        overall_balance: overall,
        available_balance: available,
        transferable_balance: transferable,
    });

    Ok(Outcome::Applied)
}

/// Process the first move of a pending transfer inscription: the atomic
/// hand-off from the inscriber's transferable balance to the receiver.
///
/// The dispatcher has already deleted the pending record; `pending` is
/// the deleted value.
pub fn process_transfer_move(
    state: &mut IndexState,
    event: &InscriptionEvent,
    pending: &PendingTransfer,
) -> HandlerResult {
    let key = tick_key(&pending.tick);
    if !state.tickers.contains_key(&key) {
        return Err(ProtocolError::TickerNotFound {
            tick: pending.tick.clone(),
        });
    }

    let amount = pending.amount.clone();
    let receiver = resolve_receiver(event, &pending.owner);
    let self_transfer = receiver == pending.owner;
    let burn = is_burn(&receiver);

    // sender side
    let sender = state.balance_mut(&pending.tick, &pending.owner);
    sender.transferable = sender.transferable.sub(&amount);
    sender.pending_transfers.remove(&event.create_key);
    sender.update_height = event.height;
    let sender_snapshot = balance_snapshot(sender);

    // receiver side: a burn credits the ticker's burned total and
    // creates no holder row
    let receiver_snapshot = if burn {
        let info = state.tickers.get_mut(&key).expect("ticker checked above");
        info.burned = info.burned.add(&amount);
        info.update_height = event.height;
        empty_snapshot()
    } else {
        let balance = state.balance_mut(&pending.tick, &receiver);
        balance.available = balance.available.add(&amount);
        if event.block_time > 0 {
            balance.available_safe = balance.available_safe.add(&amount);
        }
        balance.update_height = event.height;
        balance_snapshot(balance)
    };

    if self_transfer {
        let (overall, available, transferable) = sender_snapshot;
        state.push_history(HistoryRecord {
            kind: HistoryType::Transfer,
            valid: true,
            tick: pending.tick.clone(),
            amount: amount.to_string(),
            inscription_id: event.inscription_id.clone(),
            inscription_number: event.inscription_number,
            from: pending.owner.clone(),
            to: receiver,
            satoshi: event.satoshi,
            height: event.height,
            tx_index: event.tx_index,
            block_time: event.block_time,
            overall_balance: overall,
            available_balance: available,
            transferable_balance: transferable,
        });
    } else {
        let (overall, available, transferable) = sender_snapshot;
        state.push_history(HistoryRecord {
            kind: HistoryType::Send,
            valid: true,
            tick: pending.tick.clone(),
            amount: amount.to_string(),
            inscription_id: event.inscription_id.clone(),
            inscription_number: event.inscription_number,
            from: pending.owner.clone(),
            to: receiver.clone(),
            satoshi: event.satoshi,
            height: event.height,
            tx_index: event.tx_index,
            block_time: event.block_time,
            overall_balance: overall,
            available_balance: available,
            transferable_balance: transferable,
        });
        let (overall, available, transferable) = receiver_snapshot;
        state.push_history(HistoryRecord {
            kind: HistoryType::Receive,
            valid: true,
            tick: pending.tick.clone(),
            amount: amount.to_string(),
            inscription_id: event.inscription_id.clone(),
            inscription_number: event.inscription_number,
            from: pending.owner.clone(),
            to: receiver,
            satoshi: event.satoshi,
            height: event.height,
            tx_index: event.tx_index,
            block_time: event.block_time,
            overall_balance: overall,
            available_balance: available,
            transferable_balance: transferable,
        });
    }

    Ok(Outcome::Applied)
}
