//! Output-script helpers.
//!
//! Scripts are carried as opaque byte strings; the address codec lives in
//! the ingestion layer. The only script the indexer interprets is the
//! single-byte OP_RETURN burn output.

/// A raw output script.
pub type PkScript = Vec<u8>;

/// OP_RETURN opcode; a script of exactly this one byte burns the amount.
pub const OP_RETURN: u8 = 0x6a;

/// Whether the receiver script is the burn output.
pub fn is_burn(script: &[u8]) -> bool {
    script == [OP_RETURN]
}

/// Hex encoding used wherever scripts appear in textual records.
pub fn script_hex(script: &[u8]) -> String {
    hex::encode(script)
}

/// Decode a hex script string (payload `addr` fields).
pub fn script_from_hex(s: &str) -> Option<PkScript> {
    hex::decode(s).ok()
}
