use crate::core::activity::{ActivityEntry, ActivityError, ActivityStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteActivityStore {
    pool: Pool<Sqlite>,
}

impl SqliteActivityStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS message_counter (
                guild_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                count INTEGER NOT NULL DEFAULT 0,
                last_updated TEXT NOT NULL,
                PRIMARY KEY (guild_id, user_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn entry_from_row(row: &SqliteRow) -> ActivityEntry {
    let last_updated: String = row.get("last_updated");
    ActivityEntry {
        user_id: row.get::<i64, _>("user_id") as u64,
        guild_id: row.get::<i64, _>("guild_id") as u64,
        count: row.get::<i64, _>("count") as u64,
        // A bad timestamp shouldn't hide someone's message count
        last_updated: DateTime::parse_from_rfc3339(&last_updated)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default(),
    }
}

#[async_trait]
impl ActivityStore for SqliteActivityStore {
    async fn increment(
        &self,
        user_id: u64,
        guild_id: u64,
        at: DateTime<Utc>,
    ) -> Result<u64, ActivityError> {
        let row = sqlx::query(
            r#"
            INSERT INTO message_counter (guild_id, user_id, count, last_updated)
            VALUES (?, ?, 1, ?)
            ON CONFLICT(guild_id, user_id) DO UPDATE SET
                count = count + 1,
                last_updated = excluded.last_updated
            RETURNING count
            "#,
        )
        .bind(guild_id as i64)
        .bind(user_id as i64)
        .bind(at.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ActivityError::StorageError(e.to_string()))?;

        Ok(row.get::<i64, _>("count") as u64)
    }

    async fn get_entry(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Option<ActivityEntry>, ActivityError> {
        let row =
            sqlx::query("SELECT * FROM message_counter WHERE guild_id = ? AND user_id = ?")
                .bind(guild_id as i64)
                .bind(user_id as i64)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| ActivityError::StorageError(e.to_string()))?;

        Ok(row.as_ref().map(entry_from_row))
    }

    async fn top_entries(
        &self,
        guild_id: u64,
        limit: usize,
    ) -> Result<Vec<ActivityEntry>, ActivityError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM message_counter
            WHERE guild_id = ?
            ORDER BY count DESC, user_id ASC
            LIMIT ?
            "#,
        )
        .bind(guild_id as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ActivityError::StorageError(e.to_string()))?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    async fn delete_guild(&self, guild_id: u64) -> Result<u64, ActivityError> {
        let result = sqlx::query("DELETE FROM message_counter WHERE guild_id = ?")
            .bind(guild_id as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| ActivityError::StorageError(e.to_string()))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::database::memory_pool;

    #[tokio::test]
    async fn test_increment_and_top_entries() {
        let store = SqliteActivityStore::new(memory_pool().await);
        store.migrate().await.unwrap();

        let now = Utc::now();
        assert_eq!(store.increment(1, 100, now).await.unwrap(), 1);
        assert_eq!(store.increment(1, 100, now).await.unwrap(), 2);
        assert_eq!(store.increment(2, 100, now).await.unwrap(), 1);
        store.increment(3, 200, now).await.unwrap();

        let entry = store.get_entry(1, 100).await.unwrap().unwrap();
        assert_eq!(entry.count, 2);
        assert_eq!(entry.last_updated.timestamp(), now.timestamp());

        let top = store.top_entries(100, 10).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_id, 1);

        assert_eq!(store.delete_guild(100).await.unwrap(), 2);
        assert!(store.get_entry(1, 100).await.unwrap().is_none());
        assert!(store.get_entry(3, 200).await.unwrap().is_some());
    }
}
