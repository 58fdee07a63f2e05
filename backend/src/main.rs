use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod domain;
mod rest;

use config::AppConfig;
use db::DbConnection;
use domain::{populate_sample_data, BankService};
use rest::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    let addr = config.bind_addr()?;

    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;
    let bank_service = BankService::new(db);

    if config.populate_sample_data {
        if let Some(report) = populate_sample_data(&bank_service).await? {
            info!(
                "Sample data ready: {} customers, {} accounts, {} transactions ({} skipped)",
                report.customers, report.accounts, report.transactions, report.skipped
            );
        }
    }

    let app = create_router(AppState::new(bank_service, config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
