//! The block loop.
//!
//! Pulls events one at a time from the bounded channel and applies them
//! in order. A block boundary is the first event of a higher height;
//! there the loop checkpoints (when durty), purges the per-block
//! working sets, and honors cancellation. Nothing interrupts a block
//! mid-flight: the history/state/durty triple must stay consistent.

use tokio::sync::{broadcast, mpsc};

use ordex_core::InscriptionEvent;
use ordex_state::{apply_event, block_events_hash, IndexState};
use ordex_storage::{CheckpointStore, KvBackend};

/// Shutdown signal sender.
pub type ShutdownTx = broadcast::Sender<()>;

/// Create a shutdown channel.
pub fn shutdown_channel() -> (ShutdownTx, broadcast::Receiver<()>) {
    broadcast::channel(1)
}

/// Statistics of one indexing run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Events applied.
    pub events: u64,
    /// Blocks checkpointed.
    pub checkpoints: u64,
    /// Height of the last completed block.
    pub last_height: u32,
}

/// Run the indexing loop until the channel closes or shutdown fires.
///
/// Heights must be monotonic; a regressing height is a bug in the
/// producer and panics. A checkpoint failure aborts the process: a
/// partial write would fork consensus on restart.
pub async fn run<B: KvBackend>(
    state: &mut IndexState,
    store: &CheckpointStore<B>,
    mut events: mpsc::Receiver<InscriptionEvent>,
    mut shutdown: broadcast::Receiver<()>,
) -> RunStats {
    let mut stats = RunStats::default();
    let mut current_height: Option<u32> = None;

    loop {
        let event = match events.recv().await {
            Some(event) => event,
            None => break,
        };

        if let Some(height) = current_height {
            assert!(
                event.height >= height,
                "event height regressed: {} after {}",
                event.height,
                height
            );
            if event.height > height {
                finish_block(state, store, height, &mut stats);
                // cancellation is honored between blocks only
                if shutdown.try_recv().is_ok() {
                    tracing::info!(height, "shutdown between blocks");
                    state.purge_empty_balances();
                    return stats;
                }
            }
        }
        current_height = Some(event.height);

        apply_event(state, &event);
        stats.events += 1;
    }

    if let Some(height) = current_height {
        finish_block(state, store, height, &mut stats);
    }
    state.purge_empty_balances();
    stats
}

fn finish_block<B: KvBackend>(
    state: &mut IndexState,
    store: &CheckpointStore<B>,
    height: u32,
    stats: &mut RunStats,
) {
    stats.last_height = height;
    if !state.durty {
        state.purge_block_working_sets();
        return;
    }

    let hash = block_events_hash(state);
    match store.save(height, state) {
        Ok(rows) => {
            tracing::info!(
                height,
                rows,
                events_hash = %hex::encode(hash),
                tickers = state.tickers.len(),
                holders = state.balances.len(),
                "checkpoint"
            );
        }
        Err(e) => {
            tracing::error!(height, error = %e, "checkpoint commit failed, aborting");
            std::process::abort();
        }
    }

    state.purge_block_working_sets();
    state.durty = false;
    stats.checkpoints += 1;
}
