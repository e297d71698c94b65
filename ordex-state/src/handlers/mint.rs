//! Mint handler.

use std::cmp::Ordering;

use ordex_core::payload::MintPayload;
use ordex_core::{tick_key, Decimal, HistoryRecord, HistoryType, InscriptionEvent};

use crate::error::{HandlerResult, Outcome, ProtocolError};
use crate::handlers::balance_snapshot;
use crate::state::IndexState;

/// Process a `("brc-20", "mint")` reveal.
///
/// Mints racing for the last units of supply are clamped down to the
/// remainder; a mint arriving after completion is rejected.
pub fn process_mint(
    state: &mut IndexState,
    event: &InscriptionEvent,
    payload: &MintPayload,
) -> HandlerResult {
    let key = tick_key(&payload.tick);
    let (precision, limit, remaining, self_mint, deploy_id, tick) = {
        let info = state
            .tickers
            .get(&key)
            .ok_or_else(|| ProtocolError::TickerNotFound {
                tick: payload.tick.clone(),
            })?;
        (
            info.decimal as u32,
            info.limit.clone(),
            info.remaining(),
            info.self_mint,
            info.inscription_id.clone(),
            info.ticker.clone(),
        )
    };

    if self_mint && event.parent.as_deref() != Some(deploy_id.as_str()) {
        return Err(ProtocolError::MintParentMissing { tick });
    }

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
    if amount.cmp(&limit) == Ordering::Greater {
        return Err(ProtocolError::MintLimitExceeded { tick });
    }

    // clamp down to the unminted remainder
    let amount = match amount.cmp(&remaining) {
        Ordering::Greater => remaining,
        _ => amount,
    };
    if amount.sign() <= 0 {
        return Err(ProtocolError::MintComplete { tick });
    }

    let confirmed = event.block_time > 0;
    {
        let info = state.tickers.get_mut(&key).expect("ticker checked above");
        info.total_minted = info.total_minted.add(&amount);
        if confirmed {
            info.confirmed_minted = info.confirmed_minted.add(&amount);
        }
        info.mint_times += 1;
        if info.is_complete() && info.complete_height == 0 {
            info.complete_height = event.height;
        }
        info.update_height = event.height;
    }

    let balance = state.balance_mut(&tick, &event.pk_script);
    balance.available = balance.available.add(&amount);
    if confirmed {
        balance.available_safe = balance.available_safe.add(&amount);
    }
    balance.update_height = event.height;
    let (overall, available, transferable) = balance_snapshot(balance);

    state.push_history(HistoryRecord {
        kind: HistoryType::InscribeMint,
        valid: true,
        tick,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::process_deploy;
    use crate::state::IndexConfig;
    use crate::testing::{creation_event, deploy_payload};

    fn state_with_ticker(max: &str, lim: &str, dec: &str) -> IndexState {
        let mut state = IndexState::new(IndexConfig::default());
        let event = creation_event(1, 0, vec![0x51], b"{}".to_vec());
        let payload = deploy_payload("ordi", Some(max), Some(lim), Some(dec), None);
        process_deploy(&mut state, &event, &payload).unwrap();
        state
    }

    fn mint(state: &mut IndexState, height: u32, idx: u64, who: u8, amt: &str) -> HandlerResult {
        let event = creation_event(height, idx, vec![who], b"{}".to_vec());
        let payload = MintPayload {
            tick: "ordi".into(),
            amt: amt.into(),
        };
        process_mint(state, &event, &payload)
    }

    #[test]
    fn test_mint_credits_available() {
        let mut state = state_with_ticker("21000000", "1000", "18");
        mint(&mut state, 2, 0, 0x51, "1000").unwrap();
        let b = state.balance("ordi", &[0x51]).unwrap();
        assert_eq!(b.available.to_string(), "1000");
        assert_eq!(b.available_safe.to_string(), "1000");
        assert_eq!(state.ticker("ordi").unwrap().total_minted.to_string(), "1000");
        assert_eq!(state.ticker("ordi").unwrap().mint_times, 1);
    }

    #[test]
    fn test_mint_over_limit_rejected() {
        let mut state = state_with_ticker("21000000", "1000", "18");
        assert!(matches!(
            mint(&mut state, 2, 0, 0x51, "1001"),
            Err(ProtocolError::MintLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_mint_zero_rejected() {
        let mut state = state_with_ticker("21000000", "1000", "18");
        assert!(matches!(
            mint(&mut state, 2, 0, 0x51, "0"),
            Err(ProtocolError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_mint_overshoot_clamps_then_rejects() {
        // max=100, lim=50: 50 + 50 fill the supply; the overshooting
        // third and fourth mints are rejected
        let mut state = state_with_ticker("100", "50", "0");
        mint(&mut state, 2, 0, 0x51, "50").unwrap();
        mint(&mut state, 2, 1, 0x52, "50").unwrap();
        assert!(matches!(
            mint(&mut state, 2, 2, 0x53, "50"),
            Err(ProtocolError::MintComplete { .. })
        ));
        assert!(matches!(
            mint(&mut state, 2, 3, 0x53, "1"),
            Err(ProtocolError::MintComplete { .. })
        ));
        let info = state.ticker("ordi").unwrap();
        assert_eq!(info.total_minted.to_string(), "100");
        assert_eq!(info.complete_height, 2);
        assert_eq!(info.mint_times, 2);
    }

    #[test]
    fn test_mint_partial_clamp() {
        let mut state = state_with_ticker("80", "50", "0");
        mint(&mut state, 2, 0, 0x51, "50").unwrap();
        // only 30 left; the mint is clamped down
        mint(&mut state, 2, 1, 0x52, "50").unwrap();
        assert_eq!(
            state.balance("ordi", &[0x52]).unwrap().available.to_string(),
            "30"
        );
        assert_eq!(state.ticker("ordi").unwrap().complete_height, 2);
    }

    #[test]
    fn test_self_mint_requires_parent() {
        let mut state = IndexState::new(IndexConfig::default());
        let height = state.config.self_mint_activation_height;
        let deploy_event = creation_event(height, 0, vec![0x51], b"{}".to_vec());
        let payload = deploy_payload("abcde", Some("0"), None, Some("0"), Some("true"));
        process_deploy(&mut state, &deploy_event, &payload).unwrap();

        let payload = MintPayload {
            tick: "abcde".into(),
            amt: "10".into(),
        };
        let mut event = creation_event(height + 1, 0, vec![0x51], b"{}".to_vec());
        assert!(matches!(
            process_mint(&mut state, &event, &payload),
            Err(ProtocolError::MintParentMissing { .. })
        ));

        event.parent = Some(deploy_event.inscription_id.clone());
        process_mint(&mut state, &event, &payload).unwrap();
        assert_eq!(
            state.balance("abcde", &[0x51]).unwrap().available.to_string(),
            "10"
        );
    }

    #[test]
    fn test_mint_unknown_ticker() {
        let mut state = IndexState::new(IndexConfig::default());
        assert!(matches!(
            mint(&mut state, 2, 0, 0x51, "10"),
            Err(ProtocolError::TickerNotFound { .. })
        ));
    }
}
