use shelftrack_core::api::{ClassificationRequest, PlacementRequest};
use shelftrack_core::sync::SubmitDisposition;

use crate::cli::StatusArg;
use crate::commands::common::{open_engine, AppPaths};
use crate::error::CliError;

pub async fn run_classify(
    style_number: &str,
    color: &str,
    status: StatusArg,
    paths: &AppPaths,
) -> Result<(), CliError> {
    let style_number = non_empty(style_number).ok_or(CliError::EmptyStyleNumber)?;
    let color = non_empty(color).ok_or(CliError::EmptyColor)?;

    let engine = open_engine(paths).await?;
    let disposition = engine
        .classify(ClassificationRequest {
            style_number,
            color,
            status: status.into(),
            coordinator_name: None,
            confidence_score: None,
        })
        .await?;

    print_disposition(disposition);
    Ok(())
}

pub async fn run_place(
    classification_id: i64,
    shelf_location: &str,
    paths: &AppPaths,
) -> Result<(), CliError> {
    let shelf_location = non_empty(shelf_location).ok_or(CliError::EmptyShelfLocation)?;

    let engine = open_engine(paths).await?;
    let disposition = engine
        .place(PlacementRequest {
            classification_id,
            shelf_location,
            coordinator_user_id: None,
        })
        .await?;

    print_disposition(disposition);
    Ok(())
}

fn print_disposition(disposition: SubmitDisposition) {
    match disposition {
        SubmitDisposition::Submitted => println!("Submitted"),
        SubmitDisposition::Queued => {
            println!("Backend unreachable; queued for the next sync");
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims_and_rejects_blank() {
        assert_eq!(non_empty("  A1 "), Some("A1".to_string()));
        assert_eq!(non_empty(" \t"), None);
    }
}
