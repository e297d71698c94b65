//! Inscription payload models.
//!
//! Parsing is permissive on unknown fields and strict on expected field
//! shapes: amounts must be JSON strings (a bare JSON number rejects the
//! payload), and numeric strings must be canonical — no exponent, no
//! leading `+`, no redundant leading zeros.

mod module;
mod swap;
mod token;

pub use module::{ModuleDeployPayload, ModuleInitPayload, ModuleOpPayload};
pub use swap::{CommitFunction, CommitPayload, PoolResult, ResultCheck, UserResult};
pub use token::{DeployPayload, MintPayload, TransferPayload};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::PayloadError;

/// The protocol envelope: every payload carries `p` and `op`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Envelope {
    /// Protocol tag.
    #[serde(rename = "p")]
    pub proto: String,
    /// Operation name.
    pub op: String,
}

impl Envelope {
    /// Parse just the envelope fields from a body.
    pub fn parse(body: &[u8]) -> Result<Self, PayloadError> {
        parse_payload(body)
    }
}

/// Deserialize a payload body, mapping any JSON error to [`PayloadError`].
pub fn parse_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, PayloadError> {
    serde_json::from_slice(body).map_err(|_| PayloadError::NotJson)
}

/// Parse a canonical unsigned integer string: digits only, no sign, no
/// redundant leading zero.
pub fn canonical_uint(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}
