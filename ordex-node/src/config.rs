//! Node configuration.

use std::path::PathBuf;

use ordex_state::IndexConfig;

use crate::cli::Cli;

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Data directory for checkpoint storage.
    pub data_dir: PathBuf,
    /// Event stream file.
    pub events_path: PathBuf,
    /// Whether to resume from the last checkpoint.
    pub resume: bool,
    /// Event channel capacity.
    pub channel_capacity: usize,
    /// Log level.
    pub log_level: String,
    /// Indexer core configuration.
    pub index: IndexConfig,
}

impl NodeConfig {
    /// Create a node configuration from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        let mut index = IndexConfig::default();
        index.enable_history = !cli.no_history;
        if let Some(list) = &cli.tick_allowlist {
            index.tick_allowlist = list.iter().map(|t| t.to_lowercase()).collect();
        }
        Self {
            data_dir: cli.data_dir.clone(),
            events_path: cli.events.clone(),
            resume: cli.resume,
            channel_capacity: cli.channel_capacity.max(1),
            log_level: cli.log_level.clone(),
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli() {
        let cli = Cli::parse_from([
            "ordex-node",
            "--events",
            "events.jsonl",
            "--no-history",
            "--tick-allowlist",
            "ORDI",
        ]);
        let config = NodeConfig::from_cli(&cli);
        assert!(!config.index.enable_history);
        assert_eq!(config.index.tick_allowlist, vec!["ordi"]);
        assert_eq!(config.channel_capacity, 1024);
    }
}
