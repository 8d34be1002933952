mod central;
mod config;
mod models;
mod provision;
mod render;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use central::CentralClient;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wlan_provision=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::parse();
    tracing::info!("Starting WLAN provisioning run");
    tracing::info!("Credentials: {}", cfg.credentials_file.display());
    tracing::info!("Variables: {}", cfg.variables_file.display());
    tracing::info!("Templates: {}", cfg.templates_dir.display());

    // Credentials must load before any connection is attempted
    let credentials = config::load_credentials(&cfg.credentials_file)?;

    tracing::info!("Connecting to Central at {}...", credentials.base_url);
    let client = CentralClient::new(&credentials)?;
    if !client.test_connection().await {
        anyhow::bail!("Failed to connect to Central at {}", credentials.base_url);
    }
    tracing::info!("Connected to Central successfully");

    let variables = config::load_variables(&cfg.variables_file)?;
    let assignment = variables.assignment.clone();

    let summary = provision::provision_all(
        &client,
        &models::baseline_profiles(),
        &cfg.templates_dir,
        &variables,
        &assignment,
    )
    .await?;

    tracing::info!(
        "Provisioning complete: {} profiles assigned to {} '{}' ({} skipped)",
        summary.provisioned,
        assignment.scope_type,
        assignment.scope_name,
        summary.skipped
    );
    Ok(())
}
