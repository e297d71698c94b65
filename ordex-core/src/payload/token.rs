//! Base token payloads: deploy, mint, inscribe-transfer.

use serde::Deserialize;

/// `{"p":"brc-20","op":"deploy",...}`
///
/// `max` is optional here so the handler can distinguish "absent" (a hard
/// protocol violation worth logging) from "unparsable" (silently ignored).
#[derive(Clone, Debug, Deserialize)]
pub struct DeployPayload {
    /// Ticker name, original case.
    pub tick: String,
    /// Maximum supply, decimal string.
    #[serde(default)]
    pub max: Option<String>,
    /// Per-mint limit, decimal string.
    #[serde(default)]
    pub lim: Option<String>,
    /// Decimal places, integer string; defaults to 18.
    #[serde(default)]
    pub dec: Option<String>,
    /// `"true"` to restrict minting to children of the deploy inscription.
    #[serde(default)]
    pub self_mint: Option<String>,
}

impl DeployPayload {
    /// Whether the payload opts into self-mint.
    pub fn is_self_mint(&self) -> bool {
        self.self_mint.as_deref() == Some("true")
    }
}

/// `{"p":"brc-20","op":"mint","tick":...,"amt":...}`
#[derive(Clone, Debug, Deserialize)]
pub struct MintPayload {
    /// Ticker name.
    pub tick: String,
    /// Amount, decimal string.
    pub amt: String,
}

/// `{"p":"brc-20","op":"transfer","tick":...,"amt":...}`
#[derive(Clone, Debug, Deserialize)]
pub struct TransferPayload {
    /// Ticker name.
    pub tick: String,
    /// Amount, decimal string.
    pub amt: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::parse_payload;

    #[test]
    fn test_deploy_payload() {
        let body = br#"{"p":"brc-20","op":"deploy","tick":"ordi","max":"21000000","lim":"1000"}"#;
        let p: DeployPayload = parse_payload(body).unwrap();
        assert_eq!(p.tick, "ordi");
        assert_eq!(p.max.as_deref(), Some("21000000"));
        assert_eq!(p.dec, None);
        assert!(!p.is_self_mint());
    }

    #[test]
    fn test_deploy_self_mint_flag() {
        let body = br#"{"p":"brc-20","op":"deploy","tick":"abcde","max":"0","self_mint":"true"}"#;
        let p: DeployPayload = parse_payload(body).unwrap();
        assert!(p.is_self_mint());
        // anything but the exact string "true" does not opt in
        let body = br#"{"p":"brc-20","op":"deploy","tick":"abcde","max":"0","self_mint":"1"}"#;
        let p: DeployPayload = parse_payload(body).unwrap();
        assert!(!p.is_self_mint());
    }

    #[test]
    fn test_mint_rejects_numeric_amount() {
        let body = br#"{"p":"brc-20","op":"mint","tick":"ordi","amt":1000}"#;
        assert!(parse_payload::<MintPayload>(body).is_err());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let body = br#"{"p":"brc-20","op":"mint","tick":"ordi","amt":"5","note":"hi"}"#;
        let p: MintPayload = parse_payload(body).unwrap();
        assert_eq!(p.amt, "5");
    }
}
