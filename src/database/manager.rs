use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to {host}:{port}/{name}: {source}")]
    Connect {
        host: String,
        port: u16,
        name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database did not answer ping: {0}")]
    Ping(#[source] sqlx::Error),

    #[error("Schema migration failed: {0}")]
    Migration(#[source] sqlx::Error),
}

/// Builds the shared connection pool from configuration.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the pool and verify the server answers before returning it.
    pub async fn connect(config: &DatabaseConfig) -> Result<MySqlPool, DatabaseError> {
        let options = Self::connect_options(config);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .connect_with(options)
            .await
            .map_err(|source| DatabaseError::Connect {
                host: config.host.clone(),
                port: config.port,
                name: config.name.clone(),
                source,
            })?;

        Self::health_check(&pool).await?;

        info!(
            "Connected to MySQL at {}:{}/{} (max {} connections)",
            config.host, config.port, config.name, config.max_connections
        );
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &MySqlPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(DatabaseError::Ping)?;
        Ok(())
    }

    fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.name)
            .charset("utf8mb4");

        if config.password.is_empty() {
            options
        } else {
            options.password(&config.password)
        }
    }
}
