// Shared SQLite pool setup and schema migrations.
//
// Every store gets a clone of the same pool. Each store owns its own tables
// and exposes `migrate()`; `migrate_all` runs them in order at startup.

use crate::infra::activity::SqliteActivityStore;
use crate::infra::counting::SqliteCountingStore;
use crate::infra::economy::SqliteWalletStore;
use crate::infra::moderation::SqliteCaseStore;
use crate::infra::settings::SqliteSettingsStore;
use crate::infra::welcome::SqliteJoinStore;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;

/// Every table the bot owns, for `/setup` verification.
pub const TABLES: &[&str] = &[
    "settings",
    "counting_state",
    "counting_scores",
    "wallets",
    "cases",
    "message_counter",
    "joins",
];

/// Open (and create if missing) the SQLite database at `database_url`.
pub async fn connect(database_url: &str) -> anyhow::Result<Pool<Sqlite>> {
    // Ensure the file exists if it's a file path
    let path_str = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path_str = path_str.split('?').next().unwrap_or(path_str);
    if !database_url.contains(":memory:") && !Path::new(path_str).exists() {
        if let Some(parent) = Path::new(path_str).parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::File::create(path_str)?;
    }

    let conn_str = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite://{}", database_url)
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&conn_str)
        .await?;
    Ok(pool)
}

/// Create every table the bot needs.
pub async fn migrate_all(pool: &Pool<Sqlite>) -> anyhow::Result<()> {
    SqliteSettingsStore::new(pool.clone()).migrate().await?;
    SqliteCountingStore::new(pool.clone()).migrate().await?;
    SqliteWalletStore::new(pool.clone()).migrate().await?;
    SqliteCaseStore::new(pool.clone()).migrate().await?;
    SqliteActivityStore::new(pool.clone()).migrate().await?;
    SqliteJoinStore::new(pool.clone()).migrate().await?;

    tracing::info!("Database tables verified");
    Ok(())
}

/// Check each table answers a trivial query. Returns the tables that don't.
pub async fn verify_tables(pool: &Pool<Sqlite>) -> Vec<&'static str> {
    let mut missing = Vec::new();
    for table in TABLES {
        // Table names come from the constant list above, never from users.
        let query = format!("SELECT 1 FROM {} LIMIT 1", table);
        if let Err(e) = sqlx::query(&query).fetch_optional(pool).await {
            tracing::warn!(table, "Table check failed: {}", e);
            missing.push(*table);
        }
    }
    missing
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> Pool<Sqlite> {
    // A single connection, otherwise every connection gets its own empty
    // in-memory database.
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_creates_file_and_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("elura.db");
        let url = format!("sqlite://{}", db_path.display());

        let pool = connect(&url).await.unwrap();
        assert!(db_path.exists());

        migrate_all(&pool).await.unwrap();
        assert!(verify_tables(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn test_verify_reports_missing_tables() {
        let pool = memory_pool().await;
        let missing = verify_tables(&pool).await;
        assert_eq!(missing.len(), TABLES.len());

        migrate_all(&pool).await.unwrap();
        // Running migrations twice is harmless.
        migrate_all(&pool).await.unwrap();
        assert!(verify_tables(&pool).await.is_empty());
    }
}
