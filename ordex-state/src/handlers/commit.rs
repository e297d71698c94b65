//! Commit handlers: reveal and first move.
//!
//! A commit batch only takes effect on the first move of its
//! inscription. If its parent is the current chain head it executes
//! against live state and connects; a commit whose parent has not
//! connected yet is parked in `commit_pending` and retried whenever the
//! head advances. Execution failures send the commit to
//! `commit_invalid`.

use ordex_core::payload::{parse_payload, CommitPayload};
use ordex_core::{CommitInfo, InscriptionEvent, ModuleHistoryRecord, ModuleHistoryType};

use crate::error::{HandlerResult, Outcome, ProtocolError};
use crate::state::IndexState;
use crate::swap;

/// Process a `("brc20-swap", "commit")` reveal: register the raw batch.
pub fn process_inscribe_commit(
    state: &mut IndexState,
    event: &InscriptionEvent,
) -> HandlerResult {
    let payload: CommitPayload =
        parse_payload(&event.content_body).map_err(ProtocolError::Payload)?;
    if payload.module != payload.module.to_lowercase() {
        return Err(ProtocolError::ModuleIdNotLowercase {
            module: payload.module,
        });
    }
    if !state.modules.contains_key(&payload.module) {
        return Err(ProtocolError::ModuleNotFound {
            module: payload.module,
        });
    }
    if payload.data.is_empty() {
        return Err(ProtocolError::CommitInvalid {
            reason: "empty function list".into(),
        });
    }

    state.pending_commits.insert(
        event.create_key,
        CommitInfo {
            module: payload.module.clone(),
            owner: event.pk_script.clone(),
            inscription_id: event.inscription_id.clone(),
            body: event.content_body.clone(),
            height: event.height,
        },
    );

    let module = state
        .modules
        .get_mut(&payload.module)
        .expect("module checked above");
    module.history.push(ModuleHistoryRecord {
        kind: ModuleHistoryType::InscribeCommit,
        valid: true,
        tick: String::new(),
        amount: String::new(),
        inscription_id: event.inscription_id.clone(),
        from: event.pk_script.clone(),
        to: event.pk_script.clone(),
        height: event.height,
        tx_index: event.tx_index,
    });
    module.update_height = event.height;

    Ok(Outcome::Applied)
}

/// Process the first move of a commit inscription: connect it to the
/// module's commit chain, executing it against live state when its
/// parent is the head.
pub fn process_commit_move(
    state: &mut IndexState,
    event: &InscriptionEvent,
    info: &CommitInfo,
) -> HandlerResult {
    let payload: CommitPayload = match parse_payload(&info.body) {
        Ok(p) => p,
        Err(e) => return Err(ProtocolError::Payload(e)),
    };
    let module = state
        .modules
        .get(&info.module)
        .ok_or_else(|| ProtocolError::ModuleNotFound {
            module: info.module.clone(),
        })?;

    // only the module sequencer may land commits
    if info.owner != module.info.sequencer {
        let module = state.modules.get_mut(&info.module).expect("checked above");
        module.commit_invalid.insert(info.inscription_id.clone());
        push_commit_history(module, info, event, false);
        return Err(ProtocolError::CommitInvalid {
            reason: "not inscribed by the sequencer".into(),
        });
    }

    let commit_id = info.inscription_id.clone();
    let head = module.chain_head.clone();

    if payload.parent == head {
        connect_commit(state, info, &payload, event)?;
        // the head moved; parked children may connect now
        drain_pending_commits(state, &info.module, event);
        Ok(Outcome::Applied)
    } else if module.commit_connected.contains(&payload.parent) {
        // parent already has a connected child: a stale fork
        let module = state.modules.get_mut(&info.module).expect("checked above");
        module.commit_invalid.insert(commit_id);
        push_commit_history(module, info, event, false);
        Err(ProtocolError::CommitInvalid {
            reason: "parent already extended".into(),
        })
    } else {
        // parent not seen yet: park until the chain catches up
        let module = state.modules.get_mut(&info.module).expect("checked above");
        module.commit_pending.insert(commit_id, info.clone());
        push_commit_history(module, info, event, true);
        module.update_height = event.height;
        Ok(Outcome::Applied)
    }
}

fn connect_commit(
    state: &mut IndexState,
    info: &CommitInfo,
    payload: &CommitPayload,
    event: &InscriptionEvent,
) -> Result<(), ProtocolError> {
    // a batch must apply atomically: roll the module back if any
    // function fails partway through
    let backup = state
        .modules
        .get(&info.module)
        .cloned()
        .expect("module exists");
    match swap::execute_commit(state, &info.module, payload, event.height) {
        Ok(()) => {
            let module = state.modules.get_mut(&info.module).expect("module exists");
            module.commit_connected.insert(info.inscription_id.clone());
            module.chain_head = info.inscription_id.clone();
            push_commit_history(module, info, event, true);
            module.update_height = event.height;
            Ok(())
        }
        Err(e) => {
            let module = state.modules.get_mut(&info.module).expect("module exists");
            *module = backup;
            module.commit_invalid.insert(info.inscription_id.clone());
            push_commit_history(module, info, event, false);
            module.update_height = event.height;
            Err(e)
        }
    }
}

/// Connect any parked commits whose parent has become the head.
fn drain_pending_commits(state: &mut IndexState, module_id: &str, event: &InscriptionEvent) {
    loop {
        let next = {
            let module = match state.modules.get(module_id) {
                Some(m) => m,
                None => return,
            };
            let head = module.chain_head.clone();
            module
                .commit_pending
                .values()
                .find_map(|info| {
                    let payload: CommitPayload = parse_payload(&info.body).ok()?;
                    (payload.parent == head).then(|| (info.clone(), payload))
                })
        };
        let (info, payload) = match next {
            Some(pair) => pair,
            None => return,
        };
        let module = state.modules.get_mut(module_id).expect("module exists");
        module.commit_pending.remove(&info.inscription_id);
        // a failed child is recorded invalid; the loop continues with
        // the unchanged head
        let _ = connect_commit(state, &info, &payload, event);
    }
}

fn push_commit_history(
    module: &mut crate::state::ModuleState,
    info: &CommitInfo,
    event: &InscriptionEvent,
    valid: bool,
) {
    module.history.push(ModuleHistoryRecord {
        kind: ModuleHistoryType::Commit,
        valid,
        tick: String::new(),
        amount: String::new(),
        inscription_id: info.inscription_id.clone(),
        from: info.owner.clone(),
        to: event.pk_script.clone(),
        height: event.height,
        tx_index: event.tx_index,
    });
}
