//! Per-operation event handlers.
//!
//! Handlers are free functions over `&mut IndexState`: validation first,
//! mutation second, history last. They return [`Outcome::Ignored`] for
//! silently dropped events and an error for logged soft failures; the
//! dispatcher owns the durty flag and the pending-map bookkeeping.

mod approve;
mod commit;
mod cond_approve;
mod deploy;
mod mint;
mod module;
mod transfer;
mod withdraw;

pub use approve::{process_approve_move, process_inscribe_approve};
pub use commit::{process_commit_move, process_inscribe_commit};
pub use cond_approve::{process_cond_approve_move, process_inscribe_cond_approve};
pub use deploy::process_deploy;
pub use mint::process_mint;
pub use module::process_create_module;
pub use transfer::{process_inscribe_transfer, process_transfer_move};
pub use withdraw::{process_inscribe_withdraw, process_withdraw_move};

use std::cmp::Ordering;

use ordex_core::payload::ModuleOpPayload;
use ordex_core::{Decimal, InscriptionEvent, PkScript, UserBalance};

use crate::error::ProtocolError;
use crate::state::IndexState;

/// Resolve the receiver of a move: the destination script, or the
/// original owner when the inscription was spent as fee (`satoshi == 0`).
pub(crate) fn resolve_receiver(event: &InscriptionEvent, owner: &PkScript) -> PkScript {
    if event.satoshi == 0 {
        owner.clone()
    } else {
        event.pk_script.clone()
    }
}

/// Balance snapshot strings for history records:
/// (overall, available, transferable).
pub(crate) fn balance_snapshot(balance: &UserBalance) -> (String, String, String) {
    (
        balance.overall().to_string(),
        balance.available.to_string(),
        balance.transferable.to_string(),
    )
}

/// Snapshot for a script with no balance row (burns).
pub(crate) fn empty_snapshot() -> (String, String, String) {
    ("0".into(), "0".into(), "0".into())
}

/// Shared validation for inscribe-approve / inscribe-conditional-approve /
/// inscribe-withdraw payloads.
///
/// Returns the module id, the ticker's original-case name, its precision,
/// and the parsed amount.
pub(crate) fn validate_module_op(
    state: &IndexState,
    payload: &ModuleOpPayload,
) -> Result<(String, String, u32, Decimal), ProtocolError> {
    if payload.module != payload.module.to_lowercase() {
        return Err(ProtocolError::ModuleIdNotLowercase {
            module: payload.module.clone(),
        });
    }
    if !state.modules.contains_key(&payload.module) {
        return Err(ProtocolError::ModuleNotFound {
            module: payload.module.clone(),
        });
    }

    if !ordex_core::tick_len_ok(&payload.tick) {
        return Err(ProtocolError::TickerLengthInvalid {
            len: payload.tick.len(),
        });
    }
    let info = state
        .ticker(&payload.tick)
        .ok_or_else(|| ProtocolError::TickerNotFound {
            tick: payload.tick.clone(),
        })?;
    let precision = info.decimal as u32;

    let amount =
        Decimal::parse(&payload.amt, precision).map_err(|_| ProtocolError::AmountInvalid {
            field: "amt",
            value: payload.amt.clone(),
        })?;
    if amount.sign() <= 0 || amount.cmp(&info.max) == Ordering::Greater {
        return Err(ProtocolError::AmountOutOfRange {
            value: payload.amt.clone(),
        });
    }

    Ok((payload.module.clone(), info.ticker.clone(), precision, amount))
}
