pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "estudiantes-api")]
#[command(about = "Academic records REST backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Listening port, overrides PORT")]
        port: Option<u16>,
    },

    #[command(about = "Create any missing tables and exit")]
    Migrate,
}

/// Dispatch a parsed command line. No subcommand means `serve`.
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::run(config, port).await,
        Commands::Migrate => commands::migrate::run(config).await,
    }
}
