use clap::Parser;
use tracing_subscriber::EnvFilter;

use estudiantes_api::cli::{self, Cli};
use estudiantes_api::config::AppConfig;

const DEFAULT_LOG_FILTER: &str = "estudiantes_api=info,tower_http=info";

#[tokio::main]
async fn main() {
    // Load .env if present; plain environment variables work without it
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    if dotenv.is_err() {
        tracing::info!("No .env file found, using process environment");
    }

    let cli = Cli::parse();

    let result = match AppConfig::from_env() {
        Ok(config) => cli::run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
