//! Commit verifier.
//!
//! Re-executes a batch of swap functions against a cherry-picked
//! sandbox and validates the sequencer's declared post-states. The
//! verifier never mutates live state and never aborts: every failure is
//! reported in the returned value.

use std::cmp::Ordering;

use ordex_core::payload::{parse_payload, CommitPayload, ResultCheck};
use ordex_core::{script_from_hex, tick_key, Decimal, MAX_PRECISION};

use crate::snapshot::{cherry_pick, Selection};
use crate::state::IndexState;
use crate::swap;

/// Outcome of a commit verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitVerification {
    /// Whether the whole batch checked out.
    pub valid: bool,
    /// A critical failure invalidates the whole commit chain: the
    /// sequencer's declared state diverged from re-execution.
    /// Non-critical failures invalidate only the offending function.
    pub critical: bool,
    /// Index of the failing function; 0 on success.
    pub function_index: u32,
    /// Id of the failing function; empty on success.
    pub function_id: String,
    /// `"ok"`, or the reason for the failure.
    pub message: String,
}

impl CommitVerification {
    fn ok() -> Self {
        Self {
            valid: true,
            critical: false,
            function_index: 0,
            function_id: String::new(),
            message: "ok".into(),
        }
    }

    fn fail(critical: bool, index: u32, id: &str, message: String) -> Self {
        Self {
            valid: false,
            critical,
            function_index: index,
            function_id: id.to_string(),
            message,
        }
    }
}

/// Verify a commit chain tail.
///
/// `commits` is the ordered list of raw commit bodies; every entry
/// before the last is replayed for state-building only, and the last is
/// checked function-by-function against `results`.
pub fn verify_swap_commit(
    state: &IndexState,
    module_id: &str,
    commits: &[String],
    results: &[ResultCheck],
) -> CommitVerification {
    if commits.is_empty() {
        return CommitVerification::fail(false, 0, "", "no commits supplied".into());
    }

    let mut parsed: Vec<CommitPayload> = Vec::with_capacity(commits.len());
    for (i, raw) in commits.iter().enumerate() {
        match parse_payload::<CommitPayload>(raw.as_bytes()) {
            Ok(payload) => {
                if payload.module != module_id {
                    return CommitVerification::fail(
                        false,
                        0,
                        "",
                        format!("commit {} targets module {}", i, payload.module),
                    );
                }
                parsed.push(payload);
            }
            Err(_) => {
                return CommitVerification::fail(false, 0, "", format!("commit {} unparsable", i));
            }
        }
    }

    let selection = match build_selection(state, module_id, &parsed, results) {
        Ok(sel) => sel,
        Err(msg) => return CommitVerification::fail(false, 0, "", msg),
    };
    let mut sandbox = match cherry_pick(state, module_id, &selection) {
        Some(s) => s,
        None => {
            return CommitVerification::fail(false, 0, "", format!("module {} not found", module_id))
        }
    };

    // prior commits: replay without result-checking
    let height = state.best_height;
    let (last, prior) = parsed.split_last().expect("non-empty checked above");
    for (i, payload) in prior.iter().enumerate() {
        if let Err(e) = swap::execute_commit(&mut sandbox, module_id, payload, height) {
            return CommitVerification::fail(false, 0, "", format!("prior commit {} failed: {}", i, e));
        }
    }

    // last commit: execute and check each declared post-state
    let gas_price = match swap::parse_gas_price(&sandbox, module_id, last) {
        Ok(g) => g,
        Err(e) => return CommitVerification::fail(false, 0, "", e.to_string()),
    };
    for (i, func) in last.data.iter().enumerate() {
        if let Err(e) = swap::execute_function(&mut sandbox, module_id, func, &gas_price, height) {
            return CommitVerification::fail(false, i as u32, &func.id, e.to_string());
        }
        if let Some(check) = results.get(i) {
            if let Err(msg) = check_result(&sandbox, module_id, check) {
                return CommitVerification::fail(true, i as u32, &func.id, msg);
            }
        }
    }

    CommitVerification::ok()
}

/// Collect the users, tickers, and pools the replay will touch.
fn build_selection(
    state: &IndexState,
    module_id: &str,
    commits: &[CommitPayload],
    results: &[ResultCheck],
) -> Result<Selection, String> {
    let mut sel = Selection::default();

    if let Some(module) = state.modules.get(module_id) {
        sel.add_tick(&module.info.gas_tick);
        sel.users.insert(module.info.gas_to.clone());
    }

    for payload in commits {
        for func in &payload.data {
            let caller =
                script_from_hex(&func.addr).ok_or_else(|| "function address invalid".to_string())?;
            sel.users.insert(caller);
            match (func.func.as_str(), func.params.as_slice()) {
                ("deploy-pool", [tick0, tick1]) => {
                    sel.add_tick(tick0);
                    sel.add_tick(tick1);
                    sel.add_pool(&ordex_core::pool_pair_name(tick0, tick1));
                }
                ("addLiq", [pair, ..]) | ("swap", [pair, ..]) | ("removeLiq", [pair, ..]) => {
                    sel.add_pool(pair);
                }
                ("send", [tick, _, to_hex]) => {
                    sel.add_tick(tick);
                    let to = script_from_hex(to_hex)
                        .ok_or_else(|| "send destination invalid".to_string())?;
                    sel.users.insert(to);
                }
                _ => {}
            }
        }
    }

    for check in results {
        for user in &check.users {
            let script = script_from_hex(&user.address)
                .ok_or_else(|| "result address invalid".to_string())?;
            sel.users.insert(script);
            sel.add_tick(&user.tick);
        }
        for pool in &check.pools {
            sel.add_pool(&pool.pair);
        }
    }

    Ok(sel)
}

/// Match one declared post-state against the sandbox.
fn check_result(sandbox: &IndexState, module_id: &str, check: &ResultCheck) -> Result<(), String> {
    let module = sandbox
        .modules
        .get(module_id)
        .ok_or_else(|| "module missing from sandbox".to_string())?;

    for user in &check.users {
        let script = script_from_hex(&user.address).ok_or("result address invalid")?;
        let precision = sandbox
            .ticker(&user.tick)
            .map(|t| t.decimal as u32)
            .ok_or_else(|| format!("result ticker {} unknown", user.tick))?;
        let expected = Decimal::parse(&user.balance, precision)
            .map_err(|_| format!("result balance {} unparsable", user.balance))?;
        let actual = module
            .balance(&user.tick, &script)
            .map(|b| b.swap_account.clone())
            .unwrap_or_else(|| Decimal::zero(precision));
        if actual.cmp(&expected) != Ordering::Equal {
            return Err(format!(
                "user {} {} balance: declared {}, computed {}",
                user.address, tick_key(&user.tick), expected, actual
            ));
        }
    }

    for decl in &check.pools {
        let pool = module
            .pools
            .get(&decl.pair)
            .ok_or_else(|| format!("pool {} missing", decl.pair))?;
        let r0 = Decimal::parse(&decl.reserve0, pool.reserves[0].precision())
            .map_err(|_| format!("reserve0 {} unparsable", decl.reserve0))?;
        let r1 = Decimal::parse(&decl.reserve1, pool.reserves[1].precision())
            .map_err(|_| format!("reserve1 {} unparsable", decl.reserve1))?;
        let lp = Decimal::parse(&decl.lp, MAX_PRECISION)
            .map_err(|_| format!("lp {} unparsable", decl.lp))?;
        if pool.reserves[0].cmp(&r0) != Ordering::Equal
            || pool.reserves[1].cmp(&r1) != Ordering::Equal
            || pool.lp_total.cmp(&lp) != Ordering::Equal
        {
            return Err(format!(
                "pool {}: declared ({}, {}, {}), computed ({}, {}, {})",
                decl.pair, r0, r1, lp, pool.reserves[0], pool.reserves[1], pool.lp_total
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::state_with_module;
    use ordex_core::script_hex;

    fn fund_swap(state: &mut IndexState, id: &str, who: u8, amount: &str) {
        let balance = state
            .modules
            .get_mut(id)
            .unwrap()
            .balance_mut("ordi", 18, &vec![who]);
        balance.swap_account = Decimal::parse(amount, 18).unwrap();
    }

    fn send_commit(id: &str, gas: &str) -> String {
        format!(
            r#"{{"p":"brc20-swap","op":"commit","module":"{}","parent":"","gas_price":"{}","data":[
                {{"id":"f1","func":"send","params":["ordi","100","{}"],"addr":"{}","ts":1,"sig":""}}
            ]}}"#,
            id,
            gas,
            script_hex(&[0x62]),
            script_hex(&[0x61]),
        )
    }

    fn result_check(balances: &[(u8, &str)]) -> ResultCheck {
        serde_json::from_str(&format!(
            r#"{{"users":[{}],"pools":[]}}"#,
            balances
                .iter()
                .map(|(who, bal)| format!(
                    r#"{{"address":"{}","tick":"ordi","balance":"{}"}}"#,
                    script_hex(&[*who]),
                    bal
                ))
                .collect::<Vec<_>>()
                .join(",")
        ))
        .unwrap()
    }

    #[test]
    fn test_verify_passes_on_correct_results() {
        let (mut state, id) = state_with_module();
        fund_swap(&mut state, &id, 0x61, "1000");

        let commits = vec![send_commit(&id, "3")];
        let results = vec![result_check(&[(0x61, "897"), (0x62, "100")])];
        let verdict = verify_swap_commit(&state, &id, &commits, &results);
        assert!(verdict.valid, "message: {}", verdict.message);
        assert!(!verdict.critical);
        assert_eq!(verdict.message, "ok");

        // the sandbox replay never touched live state
        assert_eq!(
            state
                .modules
                .get(&id)
                .unwrap()
                .balance("ordi", &[0x61])
                .unwrap()
                .swap_account
                .to_string(),
            "1000"
        );
    }

    #[test]
    fn test_verify_flags_divergent_declaration() {
        let (mut state, id) = state_with_module();
        fund_swap(&mut state, &id, 0x61, "1000");

        let commits = vec![send_commit(&id, "3")];
        // declared 898 instead of the computed 897
        let results = vec![result_check(&[(0x61, "898"), (0x62, "100")])];
        let verdict = verify_swap_commit(&state, &id, &commits, &results);
        assert!(!verdict.valid);
        assert!(verdict.critical);
        assert_eq!(verdict.function_index, 0);
        assert_eq!(verdict.function_id, "f1");
    }

    #[test]
    fn test_verify_function_failure_is_not_critical() {
        let (state, id) = state_with_module();
        // no funding: the send itself fails
        let commits = vec![send_commit(&id, "0")];
        let verdict = verify_swap_commit(&state, &id, &commits, &[]);
        assert!(!verdict.valid);
        assert!(!verdict.critical);
        assert_eq!(verdict.function_id, "f1");
    }

    #[test]
    fn test_verify_replays_prior_commits() {
        let (mut state, id) = state_with_module();
        fund_swap(&mut state, &id, 0x61, "1000");

        // two sends of 100: after the second, 0x62 holds 200
        let commits = vec![send_commit(&id, "0"), send_commit(&id, "0")];
        let results = vec![result_check(&[(0x61, "800"), (0x62, "200")])];
        let verdict = verify_swap_commit(&state, &id, &commits, &results);
        assert!(verdict.valid, "message: {}", verdict.message);
    }

    #[test]
    fn test_verify_rejects_unparsable_commit() {
        let (state, id) = state_with_module();
        let verdict = verify_swap_commit(&state, &id, &["not json".to_string()], &[]);
        assert!(!verdict.valid);
        assert!(verdict.message.contains("unparsable"));
    }

    #[test]
    fn test_verify_unknown_module() {
        let (state, _) = state_with_module();
        let commits = vec![send_commit("missing", "0")];
        let verdict = verify_swap_commit(&state, "missing", &commits, &[]);
        assert!(!verdict.valid);
    }
}
