//! Shelftrack CLI - showroom inventory tracking from the terminal
//!
//! Thin consumer of `shelftrack-core`: triggers syncs, shows status,
//! lists inventory, and submits classifications and placements with
//! offline queueing.

use clap::Parser;

mod cli;
mod commands;
mod error;

use cli::{Cli, Commands, QueueCommands};
use commands::common::{resolve_data_dir, AppPaths};
use error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shelftrack=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let paths = AppPaths::new(resolve_data_dir(cli.data_dir));

    match cli.command {
        Commands::Sync { full } => commands::sync::run_sync(full, &paths).await?,
        Commands::Status => commands::status::run_status(&paths).await?,
        Commands::Inventory { limit, json } => {
            commands::inventory::run_inventory(limit, json, &paths).await?;
        }
        Commands::Classify {
            style_number,
            color,
            status,
        } => commands::submit::run_classify(&style_number, &color, status, &paths).await?,
        Commands::Place {
            classification_id,
            shelf_location,
        } => commands::submit::run_place(classification_id, &shelf_location, &paths).await?,
        Commands::Queue { command } => match command {
            QueueCommands::List { json } => commands::queue_cmd::run_queue_list(json, &paths)?,
        },
        Commands::Config { command } => commands::config::run_config(command, &paths).await?,
    }

    Ok(())
}
