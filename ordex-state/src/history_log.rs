//! Append-only history log.
//!
//! Records are stored serialized; every cross-reference elsewhere in the
//! state (per-ticker, per-user sublists) is an integer offset into this
//! log. A parallel height vector plus a first-index-by-height map give
//! O(log n) height-bounded slicing for queries.

use std::collections::BTreeMap;

use ordex_core::serialization;
use ordex_core::HistoryRecord;

/// The global history log.
#[derive(Clone, Debug, Default)]
pub struct HistoryLog {
    /// Serialized records.
    records: Vec<Vec<u8>>,
    /// Height of each record, parallel to `records`.
    heights: Vec<u32>,
    /// First record index at each height that has records.
    first_by_height: BTreeMap<u32, u32>,
    /// Indices appended since the last checkpoint, in append order.
    block_tail: Vec<u32>,
}

impl HistoryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning its index.
    ///
    /// # Panics
    /// Panics if `height` regresses below the last appended height
    /// (events must arrive in block order).
    pub fn append(&mut self, height: u32, record: &HistoryRecord) -> u32 {
        if let Some(last) = self.heights.last() {
            assert!(
                height >= *last,
                "history height regressed: {} after {}",
                height,
                last
            );
        }
        let index = self.records.len() as u32;
        let bytes = serialization::serialize(record).expect("history record serializes");
        self.records.push(bytes);
        self.heights.push(height);
        self.first_by_height.entry(height).or_insert(index);
        self.block_tail.push(index);
        index
    }

    /// Number of records in the log.
    pub fn len(&self) -> u32 {
        self.records.len() as u32
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decode the record at `index`.
    pub fn get(&self, index: u32) -> Option<HistoryRecord> {
        let bytes = self.records.get(index as usize)?;
        Some(serialization::deserialize(bytes).expect("history record decodes"))
    }

    /// Height of the record at `index`.
    pub fn height_of(&self, index: u32) -> Option<u32> {
        self.heights.get(index as usize).copied()
    }

    /// Range of record indices whose height equals `height`.
    pub fn indices_at_height(&self, height: u32) -> std::ops::Range<u32> {
        let start = match self.first_by_height.get(&height) {
            Some(i) => *i,
            None => return 0..0,
        };
        // first index of the next populated height, or end of log
        let end = self
            .first_by_height
            .range(height + 1..)
            .next()
            .map(|(_, i)| *i)
            .unwrap_or(self.records.len() as u32);
        start..end
    }

    /// Indices appended since the last checkpoint.
    pub fn block_tail(&self) -> &[u32] {
        &self.block_tail
    }

    /// Drop the per-block tail after a checkpoint. The log itself is
    /// kept in full.
    pub fn clear_block_tail(&mut self) {
        self.block_tail.clear();
    }
}
