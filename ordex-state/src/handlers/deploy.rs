//! Ticker deploy handler.

use ordex_core::payload::{canonical_uint, DeployPayload};
use ordex_core::{
    tick_key, tick_len_ok, Decimal, HistoryRecord, HistoryType, InscriptionEvent, TickerInfo,
};

use crate::error::{HandlerResult, Outcome, ProtocolError};
use crate::state::IndexState;

/// Process a `("brc-20", "deploy")` reveal.
pub fn process_deploy(
    state: &mut IndexState,
    event: &InscriptionEvent,
    payload: &DeployPayload,
) -> HandlerResult {
    let tick = payload.tick.as_str();
    if !tick_len_ok(tick) {
        return Ok(Outcome::Ignored);
    }
    if tick.len() == 5 {
        // 5-byte names are the self-mint namespace
        if !payload.is_self_mint() {
            return Ok(Outcome::Ignored);
        }
        if event.height < state.config.self_mint_activation_height {
            return Ok(Outcome::Ignored);
        }
    }

    let key = tick_key(tick);
    if !state.config.tick_allowlist.is_empty() {
        if key.contains(' ') || !state.config.tick_allowlist.contains(&key) {
            return Ok(Outcome::Ignored);
        }
    }
    if state.tickers.contains_key(&key) {
        return Ok(Outcome::Ignored);
    }

    let max_str = match payload.max.as_deref() {
        Some(s) => s,
        None => {
            return Err(ProtocolError::MaxMissing { tick: tick.into() });
        }
    };

    let dec_str = payload.dec.as_deref().unwrap_or("18");
    let decimal = match canonical_uint(dec_str) {
        Some(d) if d <= 18 => d as u8,
        _ => return Err(ProtocolError::DecimalsInvalid { dec: dec_str.into() }),
    };
    let precision = decimal as u32;

    let max = Decimal::parse(max_str, precision).map_err(|_| ProtocolError::AmountInvalid {
        field: "max",
        value: max_str.into(),
    })?;
    if max.sign() < 0 || max.is_overflow_u64() {
        return Ok(Outcome::Ignored);
    }
    let self_mint = tick.len() == 5 && payload.is_self_mint();
    let max = if max.is_zero() {
        if self_mint {
            Decimal::max_u64(precision)
        } else {
            return Err(ProtocolError::AmountOutOfRange { value: "0".into() });
        }
    } else {
        max
    };

    // lim defaults to max when absent
    let lim_str = payload.lim.as_deref().unwrap_or(max_str);
    let limit = Decimal::parse(lim_str, precision).map_err(|_| ProtocolError::AmountInvalid {
        field: "lim",
        value: lim_str.into(),
    })?;
    if limit.sign() < 0 || limit.is_overflow_u64() {
        return Err(ProtocolError::AmountOutOfRange { value: lim_str.into() });
    }
    let limit = if limit.is_zero() {
        if self_mint {
            Decimal::max_u64(precision)
        } else {
            return Err(ProtocolError::AmountOutOfRange { value: "0".into() });
        }
    } else {
        limit
    };

    let info = TickerInfo {
        ticker: tick.to_string(),
        decimal,
        max,
        limit,
        self_mint,
        deployer: event.pk_script.clone(),
        inscription_id: event.inscription_id.clone(),
        inscription_number: event.inscription_number,
        deploy_height: event.height,
        deploy_tx_index: event.tx_index,
        deploy_block_time: event.block_time,
        total_minted: Decimal::zero(precision),
        confirmed_minted: Decimal::zero(precision),
        mint_times: 0,
        burned: Decimal::zero(precision),
        complete_height: 0,
        update_height: event.height,
        history: Vec::new(),
        history_mint: Vec::new(),
        history_inscribe_transfer: Vec::new(),
        history_transfer: Vec::new(),
    };
    state.tickers.insert(key, info);

    // the deployer gets a zero balance row
    let balance = state.balance_mut(tick, &event.pk_script);
    balance.update_height = event.height;

    state.push_history(HistoryRecord {
        kind: HistoryType::InscribeDeploy,
        valid: true,
        tick: tick.to_string(),
        amount: String::new(),
        inscription_id: event.inscription_id.clone(),
        inscription_number: event.inscription_number,
        from: Vec::new(),
        to: event.pk_script.clone(),
        satoshi: event.satoshi,
        height: event.height,
        tx_index: event.tx_index,
        block_time: event.block_time,
        overall_balance: "0".into(),
        available_balance: "0".into(),
        transferable_balance: "0".into(),
    });

    Ok(Outcome::Applied)
}
