use crate::core::settings::{
    GuildSettings, SettingsError, SettingsStore, SettingsUpdate, DEFAULT_LANGUAGE,
};
use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteSettingsStore {
    pool: Pool<Sqlite>,
}

impl SqliteSettingsStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                guild_id INTEGER PRIMARY KEY,
                language TEXT NOT NULL DEFAULT 'en',
                welcome_channel INTEGER,
                modlog_channel INTEGER
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn get_settings(&self, guild_id: u64) -> Result<Option<GuildSettings>, SettingsError> {
        let row = sqlx::query("SELECT * FROM settings WHERE guild_id = ?")
            .bind(guild_id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SettingsError::StorageError(e.to_string()))?;

        Ok(row.map(|row| GuildSettings {
            guild_id,
            language: row.get("language"),
            welcome_channel: row
                .get::<Option<i64>, _>("welcome_channel")
                .map(|id| id as u64),
            modlog_channel: row
                .get::<Option<i64>, _>("modlog_channel")
                .map(|id| id as u64),
        }))
    }

    async fn insert_defaults(&self, guild_id: u64) -> Result<bool, SettingsError> {
        let result = sqlx::query(
            "INSERT INTO settings (guild_id, language) VALUES (?, ?) ON CONFLICT(guild_id) DO NOTHING",
        )
        .bind(guild_id as i64)
        .bind(DEFAULT_LANGUAGE)
        .execute(&self.pool)
        .await
        .map_err(|e| SettingsError::StorageError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn apply(&self, guild_id: u64, update: SettingsUpdate) -> Result<(), SettingsError> {
        // Column names are fixed per variant, values are always bound.
        let (column, value) = match update {
            SettingsUpdate::WelcomeChannel(id) => ("welcome_channel", id),
            SettingsUpdate::ModlogChannel(id) => ("modlog_channel", id),
        };
        let sql = format!(
            r#"
            INSERT INTO settings (guild_id, language, {column})
            VALUES (?, ?, ?)
            ON CONFLICT(guild_id) DO UPDATE SET {column} = excluded.{column}
            "#
        );

        sqlx::query(&sql)
            .bind(guild_id as i64)
            .bind(DEFAULT_LANGUAGE)
            .bind(value.map(|id| id as i64))
            .execute(&self.pool)
            .await
            .map_err(|e| SettingsError::StorageError(e.to_string()))?;

        Ok(())
    }

    async fn delete_guild(&self, guild_id: u64) -> Result<u64, SettingsError> {
        let result = sqlx::query("DELETE FROM settings WHERE guild_id = ?")
            .bind(guild_id as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| SettingsError::StorageError(e.to_string()))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::database::memory_pool;

    async fn store() -> SqliteSettingsStore {
        let store = SqliteSettingsStore::new(memory_pool().await);
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_insert_defaults_once() {
        let store = store().await;
        assert!(store.insert_defaults(1).await.unwrap());
        assert!(!store.insert_defaults(1).await.unwrap());

        let settings = store.get_settings(1).await.unwrap().unwrap();
        assert_eq!(settings, GuildSettings::defaults(1));
    }

    #[tokio::test]
    async fn test_updates_touch_only_their_column() {
        let store = store().await;
        store
            .apply(1, SettingsUpdate::ModlogChannel(Some(22)))
            .await
            .unwrap();
        store
            .apply(1, SettingsUpdate::WelcomeChannel(Some(11)))
            .await
            .unwrap();

        let settings = store.get_settings(1).await.unwrap().unwrap();
        assert_eq!(settings.welcome_channel, Some(11));
        assert_eq!(settings.modlog_channel, Some(22));
        assert_eq!(settings.language, "en");

        store
            .apply(1, SettingsUpdate::WelcomeChannel(None))
            .await
            .unwrap();
        let settings = store.get_settings(1).await.unwrap().unwrap();
        assert_eq!(settings.welcome_channel, None);
        assert_eq!(settings.modlog_channel, Some(22));

        assert_eq!(store.delete_guild(1).await.unwrap(), 1);
        assert!(store.get_settings(1).await.unwrap().is_none());
    }
}
