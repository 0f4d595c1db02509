// SQLite-backed moderation case log.
//
// Case IDs are allocated inside the INSERT itself (MAX + 1 for the guild), so
// two moderators acting at once can't be handed the same number. The
// UNIQUE (guild_id, case_id) constraint backs that up.

use crate::core::moderation::{CaseStore, CaseType, ModCase, ModerationError, NewCase};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteCaseStore {
    pool: Pool<Sqlite>,
}

impl SqliteCaseStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cases (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                guild_id INTEGER NOT NULL,
                case_id INTEGER NOT NULL,
                case_type TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                moderator_id INTEGER NOT NULL,
                reason TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (guild_id, case_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_cases_guild_user
                ON cases(guild_id, user_id, case_id DESC);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn storage_error(e: impl ToString) -> ModerationError {
    ModerationError::StorageError(e.to_string())
}

fn case_from_row(row: &SqliteRow) -> Result<ModCase, ModerationError> {
    let case_type: String = row.get("case_type");
    let created_at: String = row.get("created_at");

    Ok(ModCase {
        guild_id: row.get::<i64, _>("guild_id") as u64,
        case_id: row.get::<i64, _>("case_id") as u64,
        case_type: case_type.parse::<CaseType>().map_err(storage_error)?,
        user_id: row.get::<i64, _>("user_id") as u64,
        moderator_id: row.get::<i64, _>("moderator_id") as u64,
        reason: row.get("reason"),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(storage_error)?
            .with_timezone(&Utc),
    })
}

#[async_trait]
impl CaseStore for SqliteCaseStore {
    async fn insert_case(&self, case: NewCase) -> Result<ModCase, ModerationError> {
        let row = sqlx::query(
            r#"
            INSERT INTO cases (guild_id, case_id, case_type, user_id, moderator_id, reason, created_at)
            SELECT ?, COALESCE(MAX(case_id), 0) + 1, ?, ?, ?, ?, ?
            FROM cases
            WHERE guild_id = ?
            RETURNING case_id
            "#,
        )
        .bind(case.guild_id as i64)
        .bind(case.case_type.to_string())
        .bind(case.user_id as i64)
        .bind(case.moderator_id as i64)
        .bind(case.reason.as_str())
        .bind(case.created_at.to_rfc3339())
        .bind(case.guild_id as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(ModCase {
            guild_id: case.guild_id,
            case_id: row.get::<i64, _>("case_id") as u64,
            case_type: case.case_type,
            user_id: case.user_id,
            moderator_id: case.moderator_id,
            reason: case.reason,
            created_at: case.created_at,
        })
    }

    async fn get_case(
        &self,
        guild_id: u64,
        case_id: u64,
    ) -> Result<Option<ModCase>, ModerationError> {
        let row = sqlx::query("SELECT * FROM cases WHERE guild_id = ? AND case_id = ?")
            .bind(guild_id as i64)
            .bind(case_id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(case_from_row).transpose()
    }

    async fn cases_for_user(
        &self,
        guild_id: u64,
        user_id: u64,
        limit: usize,
    ) -> Result<Vec<ModCase>, ModerationError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM cases
            WHERE guild_id = ? AND user_id = ?
            ORDER BY case_id DESC
            LIMIT ?
            "#,
        )
        .bind(guild_id as i64)
        .bind(user_id as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(case_from_row).collect()
    }

    async fn delete_guild(&self, guild_id: u64) -> Result<u64, ModerationError> {
        let result = sqlx::query("DELETE FROM cases WHERE guild_id = ?")
            .bind(guild_id as i64)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::DEFAULT_REASON;
    use crate::infra::database::memory_pool;

    async fn store() -> SqliteCaseStore {
        let store = SqliteCaseStore::new(memory_pool().await);
        store.migrate().await.unwrap();
        store
    }

    fn new_case(guild_id: u64, user_id: u64, case_type: CaseType) -> NewCase {
        NewCase {
            guild_id,
            case_type,
            user_id,
            moderator_id: 99,
            reason: DEFAULT_REASON.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_case_ids_sequential_per_guild() {
        let store = store().await;

        let first = store.insert_case(new_case(1, 10, CaseType::Warning)).await.unwrap();
        let second = store.insert_case(new_case(1, 11, CaseType::Kick)).await.unwrap();
        let other = store.insert_case(new_case(2, 10, CaseType::Ban)).await.unwrap();

        assert_eq!(first.case_id, 1);
        assert_eq!(second.case_id, 2);
        assert_eq!(other.case_id, 1);
    }

    #[tokio::test]
    async fn test_get_case_round_trip() {
        let store = store().await;
        let written = store
            .insert_case(new_case(1, 10, CaseType::Timeout { minutes: 45 }))
            .await
            .unwrap();

        let read = store.get_case(1, written.case_id).await.unwrap().unwrap();
        assert_eq!(read.case_type, CaseType::Timeout { minutes: 45 });
        assert_eq!(read.user_id, 10);
        assert_eq!(read.moderator_id, 99);
        assert_eq!(read.reason, DEFAULT_REASON);
        assert_eq!(read.created_at.timestamp(), written.created_at.timestamp());

        assert!(store.get_case(1, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_history_newest_first_and_delete() {
        let store = store().await;
        store.insert_case(new_case(1, 10, CaseType::Warning)).await.unwrap();
        store.insert_case(new_case(1, 11, CaseType::Warning)).await.unwrap();
        store.insert_case(new_case(1, 10, CaseType::Kick)).await.unwrap();

        let history = store.cases_for_user(1, 10, 10).await.unwrap();
        let ids: Vec<u64> = history.iter().map(|c| c.case_id).collect();
        assert_eq!(ids, vec![3, 1]);

        assert_eq!(store.delete_guild(1).await.unwrap(), 3);
        // Numbering starts over once a guild's cases are gone
        let fresh = store.insert_case(new_case(1, 10, CaseType::Unban)).await.unwrap();
        assert_eq!(fresh.case_id, 1);
    }
}
