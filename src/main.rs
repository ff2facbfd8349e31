use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agent_payroll::api::{AppState, create_router};
use agent_payroll::config::ConfigLoader;
use agent_payroll::store::LocalStore;

/// Agent register and payroll documents for the Commune de Hassi Berkane.
///
/// Serves the HTTP API over the local record store.
#[derive(Debug, Parser)]
struct Cli {
    /// Directory holding `wage_table.yaml` and `registration.yaml`.
    /// The built-in configuration is used when omitted.
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// JSON file the records are persisted to.
    /// Records are kept in memory only when omitted.
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = match &cli.config_dir {
        Some(dir) => ConfigLoader::load(dir)
            .with_context(|| format!("loading configuration from {}", dir.display()))?,
        None => ConfigLoader::builtin().context("loading built-in configuration")?,
    };

    let store = match &cli.data_file {
        Some(path) => LocalStore::open(path)
            .with_context(|| format!("opening record file {}", path.display()))?,
        None => LocalStore::in_memory(),
    };

    let router = create_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(cli.addr)
        .await
        .with_context(|| format!("binding {}", cli.addr))?;
    info!(addr = %cli.addr, "Listening");

    axum::serve(listener, router).await?;

    Ok(())
}
