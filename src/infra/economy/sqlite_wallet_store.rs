// SQLite implementation of the WalletStore trait

use crate::core::economy::{EconomyError, Wallet, WalletStore};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteWalletStore {
    pool: Pool<Sqlite>,
}

impl SqliteWalletStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run database migrations to create tables.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wallets (
                guild_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                balance INTEGER NOT NULL DEFAULT 0,
                last_daily TEXT,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (guild_id, user_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Leaderboard reads sort by balance within a guild
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_wallets_guild_balance
            ON wallets(guild_id, balance DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Fixed-width UTC text, so `last_daily` compares correctly as a string.
fn timestamp_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn wallet_from_row(row: &SqliteRow) -> Wallet {
    let last_daily: Option<String> = row.get("last_daily");
    let last_daily = last_daily
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Wallet {
        user_id: row.get::<i64, _>("user_id") as u64,
        guild_id: row.get::<i64, _>("guild_id") as u64,
        balance: row.get::<i64, _>("balance"),
        last_daily,
    }
}

#[async_trait]
impl WalletStore for SqliteWalletStore {
    async fn get_wallet(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Option<Wallet>, EconomyError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, guild_id, balance, last_daily
            FROM wallets
            WHERE user_id = ? AND guild_id = ?
            "#,
        )
        .bind(user_id as i64)
        .bind(guild_id as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EconomyError::StoreError(e.to_string()))?;

        Ok(row.as_ref().map(wallet_from_row))
    }

    async fn add_to_balance(
        &self,
        user_id: u64,
        guild_id: u64,
        amount: i64,
    ) -> Result<i64, EconomyError> {
        let row = sqlx::query(
            r#"
            INSERT INTO wallets (guild_id, user_id, balance)
            VALUES (?, ?, ?)
            ON CONFLICT(guild_id, user_id) DO UPDATE SET
                balance = balance + excluded.balance,
                updated_at = CURRENT_TIMESTAMP
            RETURNING balance
            "#,
        )
        .bind(guild_id as i64)
        .bind(user_id as i64)
        .bind(amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| EconomyError::StoreError(e.to_string()))?;

        Ok(row.get::<i64, _>("balance"))
    }

    async fn claim_daily(
        &self,
        user_id: u64,
        guild_id: u64,
        amount: i64,
        now: DateTime<Utc>,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<i64>, EconomyError> {
        // The DO UPDATE only fires when the previous claim is old enough;
        // otherwise no row is returned.
        let row = sqlx::query(
            r#"
            INSERT INTO wallets (guild_id, user_id, balance, last_daily)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(guild_id, user_id) DO UPDATE SET
                balance = balance + excluded.balance,
                last_daily = excluded.last_daily,
                updated_at = CURRENT_TIMESTAMP
            WHERE wallets.last_daily IS NULL OR wallets.last_daily <= ?
            RETURNING balance
            "#,
        )
        .bind(guild_id as i64)
        .bind(user_id as i64)
        .bind(amount)
        .bind(timestamp_text(now))
        .bind(timestamp_text(cutoff))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EconomyError::StoreError(e.to_string()))?;

        Ok(row.map(|row| row.get::<i64, _>("balance")))
    }

    async fn top_balances(
        &self,
        guild_id: u64,
        limit: usize,
    ) -> Result<Vec<Wallet>, EconomyError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, guild_id, balance, last_daily
            FROM wallets
            WHERE guild_id = ?
            ORDER BY balance DESC, user_id ASC
            LIMIT ?
            "#,
        )
        .bind(guild_id as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EconomyError::StoreError(e.to_string()))?;

        Ok(rows.iter().map(wallet_from_row).collect())
    }

    async fn delete_guild(&self, guild_id: u64) -> Result<u64, EconomyError> {
        let result = sqlx::query("DELETE FROM wallets WHERE guild_id = ?")
            .bind(guild_id as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| EconomyError::StoreError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
