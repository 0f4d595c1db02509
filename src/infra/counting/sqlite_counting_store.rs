// SQLite implementation of the CountingStore trait.
//
// Tables:
// - counting_state: one row per guild (channel, current number, last user)
// - counting_scores: correct counts per (guild, user)

use crate::core::counting::{CountingError, CountingScore, CountingState, CountingStore};
use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteCountingStore {
    pool: Pool<Sqlite>,
}

impl SqliteCountingStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS counting_state (
                guild_id INTEGER PRIMARY KEY,
                channel_id INTEGER NOT NULL,
                current_number INTEGER NOT NULL DEFAULT 0,
                last_user INTEGER
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS counting_scores (
                guild_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                count INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (guild_id, user_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn store_err(e: sqlx::Error) -> CountingError {
    CountingError::StorageError(e.to_string())
}

#[async_trait]
impl CountingStore for SqliteCountingStore {
    async fn get_state(&self, guild_id: u64) -> Result<Option<CountingState>, CountingError> {
        let row = sqlx::query(
            "SELECT channel_id, current_number, last_user FROM counting_state WHERE guild_id = ?",
        )
        .bind(guild_id as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(|row| CountingState {
            guild_id,
            channel_id: row.get::<i64, _>("channel_id") as u64,
            current_number: row.get::<i64, _>("current_number") as u64,
            last_user: row.get::<Option<i64>, _>("last_user").map(|id| id as u64),
        }))
    }

    async fn save_state(&self, state: CountingState) -> Result<(), CountingError> {
        sqlx::query(
            r#"
            INSERT INTO counting_state (guild_id, channel_id, current_number, last_user)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(guild_id) DO UPDATE SET
                channel_id = excluded.channel_id,
                current_number = excluded.current_number,
                last_user = excluded.last_user
            "#,
        )
        .bind(state.guild_id as i64)
        .bind(state.channel_id as i64)
        .bind(state.current_number as i64)
        .bind(state.last_user.map(|id| id as i64))
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(())
    }

    async fn update_progress(
        &self,
        guild_id: u64,
        current_number: u64,
        last_user: Option<u64>,
    ) -> Result<(), CountingError> {
        sqlx::query(
            "UPDATE counting_state SET current_number = ?, last_user = ? WHERE guild_id = ?",
        )
        .bind(current_number as i64)
        .bind(last_user.map(|id| id as i64))
        .bind(guild_id as i64)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(())
    }

    async fn advance(
        &self,
        guild_id: u64,
        number: u64,
        user_id: u64,
    ) -> Result<u64, CountingError> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        sqlx::query(
            "UPDATE counting_state SET current_number = ?, last_user = ? WHERE guild_id = ?",
        )
        .bind(number as i64)
        .bind(user_id as i64)
        .bind(guild_id as i64)
        .execute(&mut *tx)
        .await
        .map_err(store_err)?;

        let row = sqlx::query(
            r#"
            INSERT INTO counting_scores (guild_id, user_id, count)
            VALUES (?, ?, 1)
            ON CONFLICT(guild_id, user_id) DO UPDATE SET count = count + 1
            RETURNING count
            "#,
        )
        .bind(guild_id as i64)
        .bind(user_id as i64)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_err)?;

        tx.commit().await.map_err(store_err)?;
        Ok(row.get::<i64, _>("count") as u64)
    }

    async fn top_scores(
        &self,
        guild_id: u64,
        limit: usize,
    ) -> Result<Vec<CountingScore>, CountingError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, count
            FROM counting_scores
            WHERE guild_id = ?
            ORDER BY count DESC, user_id ASC
            LIMIT ?
            "#,
        )
        .bind(guild_id as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows
            .iter()
            .map(|row| CountingScore {
                user_id: row.get::<i64, _>("user_id") as u64,
                count: row.get::<i64, _>("count") as u64,
            })
            .collect())
    }

    async fn delete_guild(&self, guild_id: u64) -> Result<u64, CountingError> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        let state = sqlx::query("DELETE FROM counting_state WHERE guild_id = ?")
            .bind(guild_id as i64)
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;
        let scores = sqlx::query("DELETE FROM counting_scores WHERE guild_id = ?")
            .bind(guild_id as i64)
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;

        tx.commit().await.map_err(store_err)?;
        Ok(state.rows_affected() + scores.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::database::memory_pool;

    async fn store() -> SqliteCountingStore {
        let store = SqliteCountingStore::new(memory_pool().await);
        store.migrate().await.unwrap();
        store
    }

    async fn configured(store: &SqliteCountingStore, guild_id: u64) {
        store
            .save_state(CountingState {
                guild_id,
                channel_id: 10,
                current_number: 0,
                last_user: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_state_round_trip_and_progress() {
        let store = store().await;
        assert!(store.get_state(1).await.unwrap().is_none());

        store
            .save_state(CountingState {
                guild_id: 1,
                channel_id: 10,
                current_number: 0,
                last_user: None,
            })
            .await
            .unwrap();
        store.update_progress(1, 7, Some(42)).await.unwrap();

        let state = store.get_state(1).await.unwrap().unwrap();
        assert_eq!(state.channel_id, 10);
        assert_eq!(state.current_number, 7);
        assert_eq!(state.last_user, Some(42));

        // Reconfiguring replaces the whole row
        store
            .save_state(CountingState {
                guild_id: 1,
                channel_id: 11,
                current_number: 0,
                last_user: None,
            })
            .await
            .unwrap();
        let state = store.get_state(1).await.unwrap().unwrap();
        assert_eq!(state.channel_id, 11);
        assert_eq!(state.last_user, None);
    }

    #[tokio::test]
    async fn test_advance_moves_count_and_credits_score() {
        let store = store().await;
        configured(&store, 1).await;
        configured(&store, 2).await;

        assert_eq!(store.advance(1, 1, 5).await.unwrap(), 1);
        assert_eq!(store.advance(1, 2, 6).await.unwrap(), 1);
        assert_eq!(store.advance(1, 3, 5).await.unwrap(), 2);
        store.advance(1, 4, 4).await.unwrap();
        store.advance(2, 1, 9).await.unwrap();

        let state = store.get_state(1).await.unwrap().unwrap();
        assert_eq!(state.current_number, 4);
        assert_eq!(state.last_user, Some(4));

        let top = store.top_scores(1, 10).await.unwrap();
        let ids: Vec<u64> = top.iter().map(|s| s.user_id).collect();
        // Ties broken by user id
        assert_eq!(ids, vec![5, 4, 6]);
        assert_eq!(top[0].count, 2);

        assert_eq!(store.top_scores(1, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_advance_rolls_back_when_score_write_fails() {
        let store = store().await;
        configured(&store, 1).await;
        store.advance(1, 1, 5).await.unwrap();

        sqlx::query("DROP TABLE counting_scores")
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(store.advance(1, 2, 6).await.is_err());

        let state = store.get_state(1).await.unwrap().unwrap();
        assert_eq!(state.current_number, 1);
        assert_eq!(state.last_user, Some(5));
    }

    #[tokio::test]
    async fn test_delete_guild_counts_rows() {
        let store = store().await;
        configured(&store, 1).await;
        configured(&store, 2).await;
        store.advance(1, 1, 5).await.unwrap();
        store.advance(1, 2, 6).await.unwrap();
        store.advance(2, 1, 5).await.unwrap();

        assert_eq!(store.delete_guild(1).await.unwrap(), 3);
        assert!(store.get_state(1).await.unwrap().is_none());
        assert!(store.get_state(2).await.unwrap().is_some());
        assert_eq!(store.top_scores(2, 10).await.unwrap().len(), 1);
    }
}
