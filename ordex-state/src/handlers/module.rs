//! Module deploy handler.

use ordex_core::payload::ModuleDeployPayload;
use ordex_core::{script_from_hex, Decimal, InscriptionEvent, ModuleInfo, MAX_PRECISION};

use crate::error::{HandlerResult, Outcome, ProtocolError};
use crate::state::{IndexState, ModuleState};

/// Process a `("brc20-module", "deploy")` reveal.
///
/// The module id is the lowercase inscription id of this reveal; the
/// payload parameters are stored verbatim. Duplicates are ignored.
pub fn process_create_module(
    state: &mut IndexState,
    event: &InscriptionEvent,
    payload: &ModuleDeployPayload,
) -> HandlerResult {
    let id = event.inscription_id.to_lowercase();
    if state.modules.contains_key(&id) {
        return Ok(Outcome::Ignored);
    }

    let sequencer = script_from_hex(&payload.init.sequencer)
        .ok_or(ProtocolError::Payload(ordex_core::PayloadError::InvalidField(
            "sequencer",
        )))?;
    let gas_to = script_from_hex(&payload.init.gas_to)
        .ok_or(ProtocolError::Payload(ordex_core::PayloadError::InvalidField(
            "gas_to",
        )))?;
    let lp_fee_to = match payload.init.lp_fee_to.as_deref() {
        Some(s) => script_from_hex(s).ok_or(ProtocolError::Payload(
            ordex_core::PayloadError::InvalidField("lp_fee_to"),
        ))?,
        None => Vec::new(),
    };

    let fee_rate_str = payload.init.swap_fee_rate.as_deref().unwrap_or("0");
    let swap_fee_rate = Decimal::parse(fee_rate_str, MAX_PRECISION).map_err(|_| {
        ProtocolError::AmountInvalid {
            field: "swap_fee_rate",
            value: fee_rate_str.into(),
        }
    })?;
    if swap_fee_rate.sign() < 0 {
        return Err(ProtocolError::AmountOutOfRange {
            value: fee_rate_str.into(),
        });
    }

    let info = ModuleInfo {
        id: id.clone(),
        name: payload.name.clone(),
        source: payload.source.clone(),
        deployer: event.pk_script.clone(),
        sequencer,
        gas_to,
        lp_fee_to,
        gas_tick: payload.init.gas_tick.clone(),
        swap_fee_rate,
        deploy_height: event.height,
        deploy_tx_index: event.tx_index,
        inscription_number: event.inscription_number,
    };
    let mut module = ModuleState::new(info);
    module.update_height = event.height;
    state.modules.insert(id, module);

    Ok(Outcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::IndexConfig;
    use crate::testing::creation_event;
    use ordex_core::payload::{ModuleInitPayload, ModuleDeployPayload};

    fn payload(sequencer: &str, fee_rate: Option<&str>) -> ModuleDeployPayload {
        ModuleDeployPayload {
            name: "swap".into(),
            source: Some("srci0".into()),
            init: ModuleInitPayload {
                gas_tick: "sats".into(),
                swap_fee_rate: fee_rate.map(Into::into),
                sequencer: sequencer.into(),
                gas_to: "53".into(),
                lp_fee_to: None,
            },
        }
    }

    #[test]
    fn test_create_module() {
        let mut state = IndexState::new(IndexConfig::default());
        let event = creation_event(10, 0, vec![0x51], b"{}".to_vec());
        assert_eq!(
            process_create_module(&mut state, &event, &payload("52", Some("0.003"))).unwrap(),
            Outcome::Applied
        );
        let id = event.inscription_id.to_lowercase();
        let module = state.modules.get(&id).unwrap();
        assert_eq!(module.info.name, "swap");
        assert_eq!(module.info.sequencer, vec![0x52]);
        assert_eq!(module.info.gas_to, vec![0x53]);
        assert_eq!(module.info.swap_fee_rate.to_string(), "0.003");
        assert_eq!(module.chain_head, "");
    }

    #[test]
    fn test_duplicate_module_ignored() {
        let mut state = IndexState::new(IndexConfig::default());
        let event = creation_event(10, 0, vec![0x51], b"{}".to_vec());
        process_create_module(&mut state, &event, &payload("52", None)).unwrap();
        assert_eq!(
            process_create_module(&mut state, &event, &payload("59", None)).unwrap(),
            Outcome::Ignored
        );
        let id = event.inscription_id.to_lowercase();
        assert_eq!(state.modules.get(&id).unwrap().info.sequencer, vec![0x52]);
    }

    #[test]
    fn test_bad_sequencer_hex_rejected() {
        let mut state = IndexState::new(IndexConfig::default());
        let event = creation_event(10, 0, vec![0x51], b"{}".to_vec());
        assert!(process_create_module(&mut state, &event, &payload("zz", None)).is_err());
    }
}
