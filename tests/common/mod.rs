#![allow(dead_code)]

use support_bot::conversation::ConversationEngine;
use support_bot::database::{DatabaseManager, Store};
use tempfile::TempDir;

pub const ADMIN_ID: i64 = 5780499255;

/// Fresh store on a temporary SQLite file with the schema applied.
pub async fn setup_test_store() -> anyhow::Result<(Store, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((Store::new(db_manager), temp_dir))
}

pub async fn setup_test_engine() -> anyhow::Result<(ConversationEngine, TempDir)> {
    let (store, temp_dir) = setup_test_store().await?;
    Ok((ConversationEngine::new(store, ADMIN_ID), temp_dir))
}
