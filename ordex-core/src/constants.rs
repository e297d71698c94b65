//! Protocol constants.

/// Protocol tag for base token operations.
pub const PROTO_TOKEN: &str = "brc-20";

/// Protocol tag for module lifecycle operations.
pub const PROTO_MODULE: &str = "brc20-module";

/// Protocol tag for swap operations inside a module.
pub const PROTO_SWAP: &str = "brc20-swap";

/// Operation names carried in the `op` payload field.
pub mod op {
    /// Deploy a ticker (`brc-20`) or a module (`brc20-module`).
    pub const DEPLOY: &str = "deploy";
    /// Mint into a ticker.
    pub const MINT: &str = "mint";
    /// Inscribe a transferable amount.
    pub const TRANSFER: &str = "transfer";
    /// Inscribe a module withdraw.
    pub const WITHDRAW: &str = "withdraw";
    /// Inscribe a swap approve.
    pub const APPROVE: &str = "approve";
    /// Inscribe a conditional swap approve.
    pub const CONDITIONAL_APPROVE: &str = "conditional-approve";
    /// Inscribe a sequencer commit batch.
    pub const COMMIT: &str = "commit";
}

/// Height at which 5-byte self-mint tickers activate.
pub const SELF_MINT_ACTIVATION_HEIGHT: u32 = 837_090;

/// Height at which module withdraws activate. Below it, conditional
/// approves are the only exit path and are probed first on moves.
pub const SWAP_WITHDRAW_ACTIVATION_HEIGHT: u32 = 847_090;

/// Minimum body length for the JSON shape heuristic.
pub const MIN_JSON_BODY_LEN: usize = 40;

/// A creation body is considered protocol-relevant JSON only if it is
/// `{...}`-wrapped after trimming and at least [`MIN_JSON_BODY_LEN`] long.
pub fn is_json_shaped(body: &[u8]) -> bool {
    if body.len() < MIN_JSON_BODY_LEN {
        return false;
    }
    let trimmed: &[u8] = {
        let start = body.iter().position(|b| !b.is_ascii_whitespace());
        let end = body.iter().rposition(|b| !b.is_ascii_whitespace());
        match (start, end) {
            (Some(s), Some(e)) => &body[s..=e],
            _ => return false,
        }
    };
    trimmed.first() == Some(&b'{') && trimmed.last() == Some(&b'}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_heuristic() {
        let body = br#"{"p":"brc-20","op":"mint","tick":"ordi","amt":"1000"}"#;
        assert!(is_json_shaped(body));
        assert!(is_json_shaped(b"  {\"p\":\"brc-20\",\"op\":\"mint\",\"tick\":\"ordi\"}  "));
        assert!(!is_json_shaped(b"{\"p\":\"brc-20\"}")); // too short
        assert!(!is_json_shaped(b"not json at all, but long enough to pass the length gate"));
        assert!(!is_json_shaped(b""));
    }
}
