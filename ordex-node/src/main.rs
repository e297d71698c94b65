//! Ordex node entry point.

use tracing_subscriber::EnvFilter;

use ordex_node::{run, shutdown_channel, spawn_file_source, Cli, NodeConfig};
use ordex_state::IndexState;
use ordex_storage::{CheckpointStore, RocksBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();
    let config = NodeConfig::from_cli(&cli);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("ordex-node v{}", env!("CARGO_PKG_VERSION"));

    let backend = RocksBackend::open(&config.data_dir)?;
    let store = CheckpointStore::new(backend);

    let mut state = if config.resume {
        let state = store.restore(config.index.clone())?;
        tracing::info!(
            height = state.best_height,
            tickers = state.tickers.len(),
            holders = state.balances.len(),
            modules = state.modules.len(),
            "restored from checkpoint"
        );
        state
    } else {
        IndexState::new(config.index.clone())
    };

    let events = spawn_file_source(&config.events_path, config.channel_capacity)?;

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received Ctrl+C, stopping at the next block boundary");
            let _ = shutdown_tx.send(());
        }
    });

    let stats = run(&mut state, &store, events, shutdown_rx).await;
    tracing::info!(
        events = stats.events,
        checkpoints = stats.checkpoints,
        height = stats.last_height,
        "indexing finished"
    );

    Ok(())
}
