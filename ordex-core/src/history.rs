//! History record types.
//!
//! The indexer keeps one append-only log of serialized records; all
//! cross-references (per-ticker, per-user sublists) are integer offsets
//! into that log. Modules keep their own typed history alongside.

use serde::{Deserialize, Serialize};

use crate::script::PkScript;

/// Kind of a global history record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryType {
    /// Ticker deploy reveal.
    InscribeDeploy,
    /// Accepted mint reveal.
    InscribeMint,
    /// Transferable-amount reveal.
    InscribeTransfer,
    /// Completed transfer where sender and receiver are the same script.
    Transfer,
    /// Sender side of a completed transfer.
    Send,
    /// Receiver side of a completed transfer.
    Receive,
    /// Completed module withdraw into the main balance.
    Withdraw,
}

impl HistoryType {
    /// Wire name of the record kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryType::InscribeDeploy => "inscribe-deploy",
            HistoryType::InscribeMint => "inscribe-mint",
            HistoryType::InscribeTransfer => "inscribe-transfer",
            HistoryType::Transfer => "transfer",
            HistoryType::Send => "send",
            HistoryType::Receive => "receive",
            HistoryType::Withdraw => "withdraw",
        }
    }
}

/// One record in the global history log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Record kind.
    pub kind: HistoryType,
    /// Whether the underlying operation was accepted.
    pub valid: bool,
    /// Ticker name, original case.
    pub tick: String,
    /// Amount as a decimal string; empty for deploys.
    pub amount: String,
    /// Inscription id.
    pub inscription_id: String,
    /// Inscription number.
    pub inscription_number: i64,
    /// Sender script; empty for reveals.
    pub from: PkScript,
    /// Receiver script.
    pub to: PkScript,
    /// Output value of the event.
    pub satoshi: u64,
    /// Event height.
    pub height: u32,
    /// Transaction index within the block.
    pub tx_index: u32,
    /// Block timestamp.
    pub block_time: u32,
    /// Receiver's overall balance after the event, as a decimal string.
    pub overall_balance: String,
    /// Receiver's available balance after the event.
    pub available_balance: String,
    /// Receiver's transferable balance after the event.
    pub transferable_balance: String,
}

/// Kind of a module history record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleHistoryType {
    /// Approve reveal.
    InscribeApprove,
    /// Approve completed by its first move.
    Approve,
    /// Conditional-approve reveal.
    InscribeConditionalApprove,
    /// Conditional-approve settled by a move.
    ConditionalApprove,
    /// Withdraw reveal.
    InscribeWithdraw,
    /// Withdraw completed by its first move.
    Withdraw,
    /// Sender-side ledger entry of a withdraw.
    WithdrawFrom,
    /// Commit reveal.
    InscribeCommit,
    /// Commit executed by its first move.
    Commit,
}

impl ModuleHistoryType {
    /// Wire name of the record kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleHistoryType::InscribeApprove => "inscribe-approve",
            ModuleHistoryType::Approve => "approve",
            ModuleHistoryType::InscribeConditionalApprove => "inscribe-conditional-approve",
            ModuleHistoryType::ConditionalApprove => "conditional-approve",
            ModuleHistoryType::InscribeWithdraw => "inscribe-withdraw",
            ModuleHistoryType::Withdraw => "withdraw",
            ModuleHistoryType::WithdrawFrom => "withdraw-from",
            ModuleHistoryType::InscribeCommit => "inscribe-commit",
            ModuleHistoryType::Commit => "commit",
        }
    }
}

/// One record of a module's history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleHistoryRecord {
    /// Record kind.
    pub kind: ModuleHistoryType,
    /// Whether the operation was accepted.
    pub valid: bool,
    /// Ticker name; empty for commits.
    pub tick: String,
    /// Amount as a decimal string; empty for commits.
    pub amount: String,
    /// Inscription id.
    pub inscription_id: String,
    /// Sender script.
    pub from: PkScript,
    /// Receiver script.
    pub to: PkScript,
    /// Event height.
    pub height: u32,
    /// Transaction index within the block.
    pub tx_index: u32,
}
