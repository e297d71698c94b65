//! Error types for the ordex core crate.

use std::fmt;

/// Errors from decimal literal parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecimalError {
    /// The input string is empty.
    Empty,
    /// The input is not a canonical decimal literal.
    Malformed(String),
    /// The fractional part has more digits than the allowed precision.
    PrecisionExceeded {
        /// Number of fractional digits in the input.
        digits: usize,
        /// Maximum allowed precision.
        max: u32,
    },
}

impl fmt::Display for DecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalError::Empty => write!(f, "empty decimal string"),
            DecimalError::Malformed(s) => write!(f, "malformed decimal literal: {:?}", s),
            DecimalError::PrecisionExceeded { digits, max } => {
                write!(f, "fraction has {} digits, precision allows {}", digits, max)
            }
        }
    }
}

impl std::error::Error for DecimalError {}

/// Errors from inscription payload parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayloadError {
    /// The body is not valid JSON.
    NotJson,
    /// A required field is missing.
    MissingField(&'static str),
    /// A field has the wrong shape or a non-canonical value.
    InvalidField(&'static str),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::NotJson => write!(f, "payload is not valid JSON"),
            PayloadError::MissingField(name) => write!(f, "payload field missing: {}", name),
            PayloadError::InvalidField(name) => write!(f, "payload field invalid: {}", name),
        }
    }
}

impl std::error::Error for PayloadError {}

/// Errors from deterministic serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to encode a value to bytes.
    EncodeFailed(String),
    /// Failed to decode a value from bytes.
    DecodeFailed(String),
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationError::EncodeFailed(msg) => write!(f, "encode failed: {}", msg),
            SerializationError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl std::error::Error for SerializationError {}
