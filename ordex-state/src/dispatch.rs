//! Event dispatcher.
//!
//! Classifies each inscription event and routes it to its handler,
//! enforcing the first-move-only rule for transfers. This is the only
//! place the durty flag and the pending-map bookkeeping are touched for
//! the move path, so a matched pending record is always deleted
//! atomically with its dispatch.

use ordex_core::constants::{self, op, PROTO_MODULE, PROTO_SWAP, PROTO_TOKEN};
use ordex_core::payload::{parse_payload, Envelope};
use ordex_core::InscriptionEvent;

use crate::error::Outcome;
use crate::handlers;
use crate::state::IndexState;

/// Apply one event to the state, in stream order.
pub fn apply_event(state: &mut IndexState, event: &InscriptionEvent) {
    // publish the event height as the indexer's best height
    state.best_height = event.height;

    if event.is_transfer {
        apply_move(state, event);
    } else {
        apply_creation(state, event);
    }
}

/// Apply an ordered batch of events, then drop zero-balance rows.
pub fn apply_events(state: &mut IndexState, events: &[InscriptionEvent]) {
    for event in events {
        apply_event(state, event);
    }
    state.purge_empty_balances();
}

fn apply_move(state: &mut IndexState, event: &InscriptionEvent) {
    let key = event.create_key;

    // below withdraw activation, conditional approves settle through
    // moves of any sequence and are probed first
    if event.height < state.config.swap_withdraw_activation_height
        && state.pending_cond_approves.contains_key(&key)
    {
        match handlers::process_cond_approve_move(state, event, &key) {
            Ok(Outcome::Applied) => state.durty = true,
            Ok(Outcome::Ignored) => {}
            Err(e) => {
                state.durty = true;
                tracing::info!(height = event.height, error = %e, "conditional approve move failed");
            }
        }
        return;
    }

    // only the first move of an inscription is protocol-relevant
    if event.sequence != 1 {
        return;
    }

    if state.transfer_removed.contains_key(&key) {
        return;
    }
    if let Some(pending) = state.pending_transfers.remove(&key) {
        state.transfer_removed.insert(key, event.height);
        state.durty = true;
        if let Err(e) = handlers::process_transfer_move(state, event, &pending) {
            tracing::info!(height = event.height, error = %e, "transfer move failed");
        }
        return;
    }

    if let Some(info) = state.pending_approves.remove(&key) {
        state.approve_removed.insert(key, event.height);
        state.durty = true;
        if let Err(e) = handlers::process_approve_move(state, event, &info) {
            tracing::info!(height = event.height, error = %e, "approve move failed");
        }
        return;
    }

    if let Some(info) = state.pending_withdraws.remove(&key) {
        state.withdraw_removed.insert(key, event.height);
        state.durty = true;
        if let Err(e) = handlers::process_withdraw_move(state, event, &info) {
            tracing::info!(height = event.height, error = %e, "withdraw move failed");
        }
        return;
    }

    if let Some(info) = state.pending_commits.remove(&key) {
        state.commit_removed.insert(key, event.height);
        state.durty = true;
        if let Err(e) = handlers::process_commit_move(state, event, &info) {
            tracing::info!(height = event.height, error = %e, "commit move failed");
        }
    }
}

fn apply_creation(state: &mut IndexState, event: &InscriptionEvent) {
    // inscribed as fee
    if event.satoshi == 0 {
        return;
    }
    if !constants::is_json_shaped(&event.content_body) {
        return;
    }
    let envelope = match Envelope::parse(&event.content_body) {
        Ok(env) => env,
        Err(_) => return,
    };

    let result = match (envelope.proto.as_str(), envelope.op.as_str()) {
        (PROTO_TOKEN, op::DEPLOY) => match parse_payload(&event.content_body) {
            Ok(payload) => handlers::process_deploy(state, event, &payload),
            Err(_) => return,
        },
        (PROTO_TOKEN, op::MINT) => match parse_payload(&event.content_body) {
            Ok(payload) => handlers::process_mint(state, event, &payload),
            Err(_) => return,
        },
        (PROTO_TOKEN, op::TRANSFER) => match parse_payload(&event.content_body) {
            Ok(payload) => handlers::process_inscribe_transfer(state, event, &payload),
            Err(_) => return,
        },
        (PROTO_MODULE, op::DEPLOY) => match parse_payload(&event.content_body) {
            Ok(payload) => handlers::process_create_module(state, event, &payload),
            Err(_) => return,
        },
        (PROTO_MODULE, op::WITHDRAW) => match parse_payload(&event.content_body) {
            Ok(payload) => handlers::process_inscribe_withdraw(state, event, &payload),
            Err(_) => return,
        },
        (PROTO_SWAP, op::APPROVE) => match parse_payload(&event.content_body) {
            Ok(payload) => handlers::process_inscribe_approve(state, event, &payload),
            Err(_) => return,
        },
        (PROTO_SWAP, op::CONDITIONAL_APPROVE) => match parse_payload(&event.content_body) {
            Ok(payload) => handlers::process_inscribe_cond_approve(state, event, &payload),
            Err(_) => return,
        },
        (PROTO_SWAP, op::COMMIT) => handlers::process_inscribe_commit(state, event),
        _ => return,
    };

    match result {
        Ok(Outcome::Applied) => state.durty = true,
        Ok(Outcome::Ignored) => {}
        Err(e) => {
            // mint failures are common (racing for the last supply
            // units) and only worth debug noise
            if envelope.op == op::MINT {
                tracing::debug!(height = event.height, error = %e, "mint rejected");
            } else {
                tracing::info!(height = event.height, error = %e, op = %envelope.op, "event rejected");
            }
        }
    }
}
