use crate::core::welcome::{JoinStore, MemberJoin, WelcomeError};
use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteJoinStore {
    pool: Pool<Sqlite>,
}

impl SqliteJoinStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS joins (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                guild_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                username TEXT NOT NULL,
                joined_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl JoinStore for SqliteJoinStore {
    async fn insert_join(&self, join: MemberJoin) -> Result<(), WelcomeError> {
        sqlx::query(
            "INSERT INTO joins (guild_id, user_id, username, joined_at) VALUES (?, ?, ?, ?)",
        )
        .bind(join.guild_id as i64)
        .bind(join.user_id as i64)
        .bind(join.username)
        .bind(join.joined_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| WelcomeError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn count_joins(&self, guild_id: u64) -> Result<u64, WelcomeError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM joins WHERE guild_id = ?")
            .bind(guild_id as i64)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| WelcomeError::StorageError(e.to_string()))?;
        Ok(row.get::<i64, _>("total") as u64)
    }

    async fn delete_guild(&self, guild_id: u64) -> Result<u64, WelcomeError> {
        let result = sqlx::query("DELETE FROM joins WHERE guild_id = ?")
            .bind(guild_id as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| WelcomeError::StorageError(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
