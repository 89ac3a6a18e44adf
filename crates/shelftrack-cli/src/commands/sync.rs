use shelftrack_core::sync::{SyncOutcome, SyncReport};

use crate::commands::common::{open_engine, AppPaths};
use crate::error::CliError;

pub async fn run_sync(full: bool, paths: &AppPaths) -> Result<(), CliError> {
    let engine = open_engine(paths).await?;

    let outcome = if full {
        engine.full_sync().await?
    } else {
        engine.incremental_sync().await?
    };

    match outcome {
        SyncOutcome::Completed(report) => print_report(&report),
        SyncOutcome::AlreadySyncing => println!("Sync already in progress"),
    }

    Ok(())
}

fn print_report(report: &SyncReport) {
    println!(
        "Sync completed: {} styles, {} placements",
        report.styles, report.placements
    );
    if report.uploaded > 0 || report.upload_failures > 0 {
        println!(
            "Uploaded {} queued changes ({} retained for retry)",
            report.uploaded, report.upload_failures
        );
    }
}
