//! Error types for state machine operations.
//!
//! Every variant here is a *soft* protocol error: the offending event is
//! ignored (or, for reported operational errors, recorded as invalid
//! history) and indexing continues. Hard errors — decimal precision
//! mismatches, broken internal invariants — panic instead, because
//! continuing would fork consensus.

use ordex_core::PayloadError;

/// All soft validation and execution errors for event processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    // === Payload Errors ===
    /// Payload failed to parse or had a malformed field.
    Payload(PayloadError),
    /// Ticker name has an illegal byte length.
    TickerLengthInvalid { len: usize },
    /// Decimal places field out of range or malformed.
    DecimalsInvalid { dec: String },

    // === Ticker Errors ===
    /// Referenced ticker is not deployed.
    TickerNotFound { tick: String },
    /// Deploy without a max field.
    MaxMissing { tick: String },
    /// Amount failed to parse at the ticker's precision.
    AmountInvalid { field: &'static str, value: String },
    /// Amount outside the legal range for the operation.
    AmountOutOfRange { value: String },

    // === Mint Errors ===
    /// Supply already fully minted.
    MintComplete { tick: String },
    /// Amount exceeds the per-mint limit.
    MintLimitExceeded { tick: String },
    /// Self-mint without the deploy inscription as parent.
    MintParentMissing { tick: String },

    // === Transfer Errors ===
    /// Inscriber's available balance is below the inscribed amount.
    InsufficientAvailable { tick: String, available: String, needed: String },

    // === Module Errors ===
    /// Module id is not lowercase.
    ModuleIdNotLowercase { module: String },
    /// Referenced module does not exist.
    ModuleNotFound { module: String },
    /// Module withdraws are not active at this height.
    WithdrawNotActive { height: u32 },
    /// Move of a withdraw inscription not present in the owner's
    /// ready-to-withdraw map (duplicate move).
    WithdrawDuplicate,
    /// Module-level available balance below the withdraw amount.
    WithdrawInsufficient { tick: String, available: String, needed: String },
    /// Module-level approveable balance below the approve amount.
    ApproveInsufficient { tick: String, approveable: String, needed: String },
    /// Commit rejected before execution.
    CommitInvalid { reason: String },

    // === Swap Function Errors ===
    /// Pool already exists for the pair.
    PoolExists { pair: String },
    /// Pool does not exist for the pair.
    PoolNotFound { pair: String },
    /// Ticker is not one of the pool's pair.
    TickNotInPool { tick: String, pair: String },
    /// Swap-account balance below the required amount.
    SwapAccountInsufficient { tick: String, balance: String, needed: String },
    /// LP balance below the requested burn.
    LpInsufficient { balance: String, needed: String },
    /// Computed output diverges from the declared expectation beyond slippage.
    SlippageExceeded { expected: String, actual: String },
    /// Function name not recognized.
    UnknownFunction { func: String },
    /// Function parameter list has the wrong shape.
    FunctionParamsInvalid { func: &'static str },
    /// Function caller script is not a valid hex script.
    FunctionAddressInvalid,
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Payload(e) => write!(f, "payload: {}", e),
            ProtocolError::TickerLengthInvalid { len } => {
                write!(f, "ticker length {} not 4 or 5", len)
            }
            ProtocolError::DecimalsInvalid { dec } => {
                write!(f, "dec field invalid: {:?}", dec)
            }
            ProtocolError::TickerNotFound { tick } => {
                write!(f, "ticker not deployed: {:?}", tick)
            }
            ProtocolError::MaxMissing { tick } => {
                write!(f, "deploy of {:?} missing max", tick)
            }
            ProtocolError::AmountInvalid { field, value } => {
                write!(f, "{} invalid: {:?}", field, value)
            }
            ProtocolError::AmountOutOfRange { value } => {
                write!(f, "amount out of range: {}", value)
            }
            ProtocolError::MintComplete { tick } => {
                write!(f, "mint of {:?}: supply complete", tick)
            }
            ProtocolError::MintLimitExceeded { tick } => {
                write!(f, "mint of {:?} exceeds limit", tick)
            }
            ProtocolError::MintParentMissing { tick } => {
                write!(f, "self-mint of {:?} without deploy parent", tick)
            }
            ProtocolError::InsufficientAvailable { tick, available, needed } => {
                write!(
                    f,
                    "insufficient available {}: have {}, need {}",
                    tick, available, needed
                )
            }
            ProtocolError::ModuleIdNotLowercase { module } => {
                write!(f, "module id not lowercase: {:?}", module)
            }
            ProtocolError::ModuleNotFound { module } => {
                write!(f, "module not found: {:?}", module)
            }
            ProtocolError::WithdrawNotActive { height } => {
                write!(f, "module withdraw inactive at height {}", height)
            }
            ProtocolError::WithdrawDuplicate => write!(f, "withdraw already moved (dup)"),
            ProtocolError::WithdrawInsufficient { tick, available, needed } => {
                write!(
                    f,
                    "withdraw of {} insufficient: have {}, need {}",
                    tick, available, needed
                )
            }
            ProtocolError::ApproveInsufficient { tick, approveable, needed } => {
                write!(
                    f,
                    "approve of {} insufficient: have {}, need {}",
                    tick, approveable, needed
                )
            }
            ProtocolError::CommitInvalid { reason } => write!(f, "commit invalid: {}", reason),
            ProtocolError::PoolExists { pair } => write!(f, "pool exists: {}", pair),
            ProtocolError::PoolNotFound { pair } => write!(f, "pool not found: {}", pair),
            ProtocolError::TickNotInPool { tick, pair } => {
                write!(f, "tick {:?} not in pool {}", tick, pair)
            }
            ProtocolError::SwapAccountInsufficient { tick, balance, needed } => {
                write!(
                    f,
                    "swap account {} insufficient: have {}, need {}",
                    tick, balance, needed
                )
            }
            ProtocolError::LpInsufficient { balance, needed } => {
                write!(f, "lp insufficient: have {}, need {}", balance, needed)
            }
            ProtocolError::SlippageExceeded { expected, actual } => {
                write!(f, "slippage exceeded: expected {}, got {}", expected, actual)
            }
            ProtocolError::UnknownFunction { func } => {
                write!(f, "unknown swap function: {:?}", func)
            }
            ProtocolError::FunctionParamsInvalid { func } => {
                write!(f, "bad params for swap function {}", func)
            }
            ProtocolError::FunctionAddressInvalid => write!(f, "swap function address invalid"),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<PayloadError> for ProtocolError {
    fn from(e: PayloadError) -> Self {
        ProtocolError::Payload(e)
    }
}

/// What a handler did with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// State was mutated; the durty flag must be raised.
    Applied,
    /// The event was silently ignored with no state change.
    Ignored,
}

/// Result type for event handlers.
pub type HandlerResult = Result<Outcome, ProtocolError>;
