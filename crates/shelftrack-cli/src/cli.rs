use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use shelftrack_core::models::ItemStatus;

#[derive(Parser)]
#[command(name = "shelftrack")]
#[command(about = "Offline-first showroom inventory tracking client")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional data directory (database, queue, and config files)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synchronize with the backend
    Sync {
        /// Replace local state with a complete snapshot
        #[arg(long)]
        full: bool,
    },
    /// Show sync state and local counts
    Status,
    /// List showroom inventory
    Inventory {
        /// Number of items to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify a style/color (queued when offline)
    Classify {
        /// Style number
        style_number: String,
        /// Color name
        color: String,
        /// Classification decision
        #[arg(long, value_enum)]
        status: StatusArg,
    },
    /// Record a shelf placement (queued when offline)
    Place {
        /// Classification the placement belongs to
        classification_id: i64,
        /// Shelf location, e.g. A3
        shelf_location: String,
    },
    /// Inspect the pending write queue
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
    /// Manage client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum QueueCommands {
    /// List queued writes awaiting acknowledgment
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the active configuration
    Show,
    /// Set the backend endpoint after a connectivity check
    SetEndpoint {
        /// Backend base URL, e.g. https://api.example.com
        url: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StatusArg {
    Keep,
    Wait,
    Drop,
}

impl From<StatusArg> for ItemStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Keep => Self::Keep,
            StatusArg::Wait => Self::Wait,
            StatusArg::Drop => Self::Drop,
        }
    }
}
