use shelftrack_core::api::GatewayClient;

use crate::cli::ConfigCommands;
use crate::commands::common::{load_config, AppPaths};
use crate::error::CliError;

pub async fn run_config(command: ConfigCommands, paths: &AppPaths) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_config_show(paths),
        ConfigCommands::SetEndpoint { url } => run_set_endpoint(&url, paths).await,
    }
}

fn run_config_show(paths: &AppPaths) -> Result<(), CliError> {
    let config = load_config(paths)?;
    println!("Device:   {}", config.device_id);
    println!(
        "Endpoint: {}",
        config.backend_url.as_deref().unwrap_or("(not configured)")
    );
    Ok(())
}

/// Validate the candidate endpoint and activate it only after the
/// backend answers the health probe.
async fn run_set_endpoint(url: &str, paths: &AppPaths) -> Result<(), CliError> {
    let mut config = load_config(paths)?;
    config.set_backend_url(url)?;

    let endpoint = config
        .backend_url
        .clone()
        .ok_or(CliError::NoEndpoint)?;

    let client = GatewayClient::new(endpoint.clone())?;
    if !client.test_connectivity().await {
        return Err(CliError::EndpointUnreachable(endpoint));
    }

    config.save(&paths.config)?;
    println!("Endpoint set to {endpoint}");
    Ok(())
}
