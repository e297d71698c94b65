//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Ordex indexer node.
#[derive(Parser, Debug, Clone)]
#[command(name = "ordex-node")]
#[command(about = "Deterministic inscription-token indexer")]
#[command(version)]
pub struct Cli {
    /// Data directory for checkpoint storage.
    #[arg(long, default_value = "./ordex-data")]
    pub data_dir: PathBuf,

    /// Event stream file (one JSON event per line).
    #[arg(long)]
    pub events: PathBuf,

    /// Resume from the last checkpoint instead of starting empty.
    #[arg(long)]
    pub resume: bool,

    /// Disable history recording (faster bulk resync).
    #[arg(long)]
    pub no_history: bool,

    /// Comma-separated ticker allow-list (empty disables the list).
    #[arg(long, value_delimiter = ',')]
    pub tick_allowlist: Option<Vec<String>>,

    /// Event channel capacity; the producer blocks when it is full.
    #[arg(long, default_value_t = 1024)]
    pub channel_capacity: usize,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cli = Cli::parse_from(["ordex-node", "--events", "events.jsonl"]);
        assert_eq!(cli.events, PathBuf::from("events.jsonl"));
        assert!(!cli.resume);
        assert!(!cli.no_history);
        assert_eq!(cli.channel_capacity, 1024);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_allowlist_parsing() {
        let cli = Cli::parse_from([
            "ordex-node",
            "--events",
            "events.jsonl",
            "--tick-allowlist",
            "ordi,sats",
        ]);
        assert_eq!(cli.tick_allowlist.unwrap(), vec!["ordi", "sats"]);
    }
}
