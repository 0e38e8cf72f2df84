use tracing::info;

use crate::config::AppConfig;
use crate::database::{schema, DatabaseManager};

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database).await?;
    schema::apply(&pool).await?;
    pool.close().await;

    info!("Schema up to date in {}", config.database.name);
    Ok(())
}
