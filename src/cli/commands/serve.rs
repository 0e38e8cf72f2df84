use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::{DatabaseManager, MySqlStore};
use crate::notifier::{ChangeNotifier, HttpNotifier};
use crate::routes;
use crate::state::AppState;

/// Connect, bind, announce, serve. A database that cannot be reached is fatal.
pub async fn run(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    info!("Starting estudiantes API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database).await?;
    let notifier = Arc::new(HttpNotifier::new(&config.middleware)?);
    let state = AppState::new(Arc::new(MySqlStore::new(pool)), notifier.clone());

    let app = routes::app(state, &config.server.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.server.port)));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);

    if let Err(e) = notifier.notify_online().await {
        warn!("Could not announce startup to middleware: {}", e);
    }

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
