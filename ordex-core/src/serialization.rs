//! Deterministic binary serialization.
//!
//! History records and storage rows are encoded with a fixed bincode
//! configuration (fixed-size integers, little-endian, no trailing bytes)
//! so identical state always produces identical bytes on every platform.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::SerializationError;

fn config() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Serialize a value to deterministic bytes.
pub fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    config()
        .serialize(value)
        .map_err(|e| SerializationError::EncodeFailed(e.to_string()))
}

/// Deserialize a value from bytes, rejecting trailing garbage.
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    config()
        .deserialize(bytes)
        .map_err(|e| SerializationError::DecodeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HistoryRecord, HistoryType};

    fn sample_record() -> HistoryRecord {
        HistoryRecord {
            kind: HistoryType::InscribeMint,
            valid: true,
            tick: "ordi".into(),
            amount: "1000".into(),
            inscription_id: "aai0".into(),
            inscription_number: 7,
            from: vec![],
            to: vec![0x51],
            satoshi: 330,
            height: 800_000,
            tx_index: 3,
            block_time: 1_700_000_000,
            overall_balance: "1000".into(),
            available_balance: "1000".into(),
            transferable_balance: "0".into(),
        }
    }

    #[test]
    fn test_roundtrip() {
        let rec = sample_record();
        let bytes = serialize(&rec).unwrap();
        let back: HistoryRecord = deserialize(&bytes).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn test_determinism() {
        let rec = sample_record();
        assert_eq!(serialize(&rec).unwrap(), serialize(&rec).unwrap());
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let mut bytes = serialize(&42u64).unwrap();
        bytes.push(0xff);
        assert!(deserialize::<u64>(&bytes).is_err());
    }
}
