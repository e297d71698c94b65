//! Swap commit payloads and verifier result checks.

use serde::Deserialize;

/// `{"p":"brc20-swap","op":"commit","module":...,"parent":...,"data":[...]}`
///
/// A sequencer-signed batch of swap functions. `parent` chains commits:
/// it names the previous commit's inscription id, or is empty for the
/// first commit of a module.
#[derive(Clone, Debug, Deserialize)]
pub struct CommitPayload {
    /// Target module id.
    pub module: String,
    /// Inscription id of the previous commit; empty for the chain head.
    #[serde(default)]
    pub parent: String,
    /// Gas charged per function, decimal string in the module's gas tick.
    #[serde(default)]
    pub gas_price: Option<String>,
    /// Ordered function batch.
    pub data: Vec<CommitFunction>,
}

/// One function inside a commit batch.
#[derive(Clone, Debug, Deserialize)]
pub struct CommitFunction {
    /// Function id assigned by the sequencer.
    pub id: String,
    /// Function name: `deploy-pool`, `addLiq`, `swap`, `removeLiq`, `send`.
    pub func: String,
    /// Positional parameters; layout depends on `func`.
    pub params: Vec<String>,
    /// Caller script, hex-encoded.
    pub addr: String,
    /// Client timestamp, passed through.
    #[serde(default)]
    pub ts: u64,
    /// Caller signature, passed through (verified upstream).
    #[serde(default)]
    pub sig: String,
}

/// Declared post-state after one function, checked by the verifier.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResultCheck {
    /// Expected per-user balances.
    #[serde(default)]
    pub users: Vec<UserResult>,
    /// Expected per-pool reserves.
    #[serde(default)]
    pub pools: Vec<PoolResult>,
}

/// Expected swap-account balance of one user.
#[derive(Clone, Debug, Deserialize)]
pub struct UserResult {
    /// User script, hex-encoded.
    pub address: String,
    /// Ticker name.
    pub tick: String,
    /// Expected swap-account balance, decimal string.
    pub balance: String,
}

/// Expected reserves of one pool.
#[derive(Clone, Debug, Deserialize)]
pub struct PoolResult {
    /// Canonical pair name (`tick0/tick1`, lexicographic).
    pub pair: String,
    /// Expected reserve of the pair's first ticker.
    pub reserve0: String,
    /// Expected reserve of the pair's second ticker.
    pub reserve1: String,
    /// Expected LP total.
    pub lp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::parse_payload;

    #[test]
    fn test_commit_payload() {
        let body = br#"{"p":"brc20-swap","op":"commit","module":"abci0","parent":"",
            "gas_price":"0","data":[
              {"id":"f1","func":"send","params":["ordi","100","51bb"],"addr":"51aa","ts":1,"sig":""}
            ]}"#;
        let p: CommitPayload = parse_payload(body).unwrap();
        assert_eq!(p.module, "abci0");
        assert_eq!(p.parent, "");
        assert_eq!(p.data.len(), 1);
        assert_eq!(p.data[0].func, "send");
        assert_eq!(p.data[0].params[1], "100");
    }

    #[test]
    fn test_result_check_defaults() {
        let rc: ResultCheck = serde_json::from_str(r#"{"users":[]}"#).unwrap();
        assert!(rc.users.is_empty());
        assert!(rc.pools.is_empty());
    }

    #[test]
    fn test_commit_requires_data() {
        let body = br#"{"p":"brc20-swap","op":"commit","module":"abci0"}"#;
        assert!(parse_payload::<CommitPayload>(body).is_err());
    }
}
