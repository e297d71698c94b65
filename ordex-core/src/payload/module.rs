//! Module lifecycle payloads.

use serde::Deserialize;

/// `{"p":"brc20-module","op":"deploy","name":...,"init":{...}}`
///
/// The module id is the inscription id of this deploy; the payload is
/// stored verbatim on the module.
#[derive(Clone, Debug, Deserialize)]
pub struct ModuleDeployPayload {
    /// Human-readable module name.
    pub name: String,
    /// Source inscription the module's code derives from, passed through.
    #[serde(default)]
    pub source: Option<String>,
    /// Module parameters.
    pub init: ModuleInitPayload,
}

/// The `init` block of a module deploy.
///
/// Script-valued fields are hex-encoded output scripts; the address codec
/// lives in the ingestion layer.
#[derive(Clone, Debug, Deserialize)]
pub struct ModuleInitPayload {
    /// Ticker gas fees are charged in.
    pub gas_tick: String,
    /// Swap fee rate as a decimal string (e.g. `"0.003"`); defaults to 0.
    #[serde(default)]
    pub swap_fee_rate: Option<String>,
    /// Script of the sequencer allowed to commit.
    pub sequencer: String,
    /// Script gas fees are collected to.
    pub gas_to: String,
    /// Script the LP share of swap fees accrues to.
    #[serde(default)]
    pub lp_fee_to: Option<String>,
}

/// Shared shape of inscribe-approve, inscribe-conditional-approve and
/// inscribe-withdraw payloads: `{"module":...,"tick":...,"amt":...}`.
#[derive(Clone, Debug, Deserialize)]
pub struct ModuleOpPayload {
    /// Target module id (must already be lowercase).
    pub module: String,
    /// Ticker name.
    pub tick: String,
    /// Amount, decimal string.
    pub amt: String,
}
