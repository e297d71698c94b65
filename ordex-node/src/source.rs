//! JSONL event source.
//!
//! Reads inscription events from a file with one JSON object per line
//! and feeds them into a bounded channel, blocking when the indexer
//! falls behind. This is the standalone counterpart of the external
//! ingestion pipeline; blank lines are skipped, malformed lines abort
//! (a corrupt event stream must never be partially indexed).

use std::io::{BufRead, BufReader};
use std::path::Path;

use tokio::sync::mpsc;

use ordex_core::InscriptionEvent;

/// Read all events from a JSONL file, in file order.
pub fn read_events(path: &Path) -> std::io::Result<Vec<InscriptionEvent>> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut events = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: InscriptionEvent = serde_json::from_str(&line).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("event line {}: {}", lineno + 1, e),
            )
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Spawn a producer task feeding the file's events into a bounded
/// channel. The producer blocks when the channel is full.
pub fn spawn_file_source(
    path: &Path,
    capacity: usize,
) -> std::io::Result<mpsc::Receiver<InscriptionEvent>> {
    let events = read_events(path)?;
    let (tx, rx) = mpsc::channel(capacity);
    tokio::spawn(async move {
        for event in events {
            if tx.send(event).await.is_err() {
                // consumer is gone; stop producing
                return;
            }
        }
    });
    Ok(rx)
}
