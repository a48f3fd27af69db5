#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]
#![allow(clippy::print_stdout)]

use clap::Parser;
use std::sync::Arc;
use teammeet_client::{
    api::HttpTeamApi,
    cli::{execute, Cli},
    config::Config,
    session::FileSessionStore,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Load and validate configuration first (fail-fast)
    let config = Config::load_from(&cli.config).map_err(|e| anyhow::anyhow!("{e}"))?;

    // RUST_LOG wins over the configured level; logs go to stderr so stdout stays JSON
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "teammeet starting"
    );

    let session = Arc::new(FileSessionStore::new(&config.session.token_path));
    let api = HttpTeamApi::from_config(&config.api, session.clone())?;

    match execute(cli.command, &api, session.as_ref()).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            Err(err)
        }
    }
}
