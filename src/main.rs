use anyhow::{Context, Result};
use planward::account::{spawn_loader, StaticAccountService};
use planward::config::Config;
use planward::session::Session;
use planward::tui;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("planward.toml"));
    let config = Config::load_or_default(&config_path)?;

    // Load saved overrides from .env (real env vars take precedence)
    Config::load_env_file();

    let log_file = std::fs::File::create(&config.logging.file)
        .with_context(|| format!("Failed to create log file: {}", config.logging.file))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let service = StaticAccountService::from_config(&config)?;
    tracing::info!(config = %config_path.display(), "starting dashboard");

    let (account_tx, account_rx) = mpsc::channel(4);
    let loader = spawn_loader(service, account_tx);

    let session = Session::new(config);
    let result = tui::run_tui(session, account_rx).await;

    loader.abort();
    tracing::debug!("shutting down");
    result
}
