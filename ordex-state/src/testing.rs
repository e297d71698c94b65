//! Shared builders for handler unit tests.

use ordex_core::payload::{DeployPayload, ModuleDeployPayload, ModuleInitPayload};
use ordex_core::{event_key, InscriptionEvent, PkScript};

use crate::handlers::{process_create_module, process_deploy};
use crate::state::{IndexConfig, IndexState};

/// A creation event (reveal) at the given position.
pub(crate) fn creation_event(
    height: u32,
    idx: u64,
    script: PkScript,
    body: Vec<u8>,
) -> InscriptionEvent {
    InscriptionEvent {
        is_transfer: false,
        create_key: event_key(height, idx),
        height,
        tx_index: idx as u32,
        sequence: 0,
        sat_offset: 0,
        satoshi: 330,
        pk_script: script,
        inscription_number: (height as i64) * 1000 + idx as i64,
        inscription_id: format!("{:08x}{:04x}i0", height, idx),
        content_body: body,
        parent: None,
        block_time: 1_700_000_000,
    }
}

/// A move event for the inscription created by `created`.
pub(crate) fn move_event(
    created: &InscriptionEvent,
    height: u32,
    idx: u64,
    sequence: u32,
    to_script: PkScript,
    satoshi: u64,
) -> InscriptionEvent {
    InscriptionEvent {
        is_transfer: true,
        create_key: created.create_key,
        height,
        tx_index: idx as u32,
        sequence,
        sat_offset: 0,
        satoshi,
        pk_script: to_script,
        inscription_number: created.inscription_number,
        inscription_id: created.inscription_id.clone(),
        content_body: Vec::new(),
        parent: None,
        block_time: 1_700_000_000,
    }
}

/// A state with the "ordi" ticker deployed (max 21000000, lim 1000,
/// dec 18) and one swap module. Returns the state and the module id.
///
/// Module scripts: deployer 0x51, sequencer 0x52, gas collector 0x53;
/// gas ticker is "ordi" with fee rate 0.003.
pub(crate) fn state_with_module() -> (IndexState, String) {
    let mut state = IndexState::new(IndexConfig::default());
    let event = creation_event(1, 0, vec![0x51], b"{}".to_vec());
    let payload = deploy_payload("ordi", Some("21000000"), Some("1000"), None, None);
    process_deploy(&mut state, &event, &payload).unwrap();

    let event = creation_event(1, 1, vec![0x51], b"{}".to_vec());
    let payload = ModuleDeployPayload {
        name: "swap".into(),
        source: None,
        init: ModuleInitPayload {
            gas_tick: "ordi".into(),
            swap_fee_rate: Some("0.003".into()),
            sequencer: "52".into(),
            gas_to: "53".into(),
            lp_fee_to: None,
        },
    };
    process_create_module(&mut state, &event, &payload).unwrap();
    let id = event.inscription_id.to_lowercase();
    (state, id)
}

/// A deploy payload with the given optional fields.
pub(crate) fn deploy_payload(
    tick: &str,
    max: Option<&str>,
    lim: Option<&str>,
    dec: Option<&str>,
    self_mint: Option<&str>,
) -> DeployPayload {
    DeployPayload {
        tick: tick.to_string(),
        max: max.map(Into::into),
        lim: lim.map(Into::into),
        dec: dec.map(Into::into),
        self_mint: self_mint.map(Into::into),
    }
}
