// Economy system core - business logic for server credits
//
// Platform-agnostic like the other core modules. Balances only ever change
// through single store calls (`add_to_balance`, `claim_daily`), never
// read-modify-write, so two commands racing on the same wallet can't lose an
// update or pay a daily twice.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// A user's wallet in a specific guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    pub user_id: u64,
    pub guild_id: u64,
    pub balance: i64,
    pub last_daily: Option<DateTime<Utc>>,
}

/// Result of a `/work` shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkResult {
    pub earned: i64,
    pub new_balance: i64,
}

/// Result of a successful daily claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClaim {
    pub coins_awarded: i64,
    pub new_balance: i64,
    pub next_claim_time: DateTime<Utc>,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum EconomyError {
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Store error: {0}")]
    StoreError(String),
}

// ============================================================================
// STORAGE TRAIT
// ============================================================================

#[async_trait]
pub trait WalletStore: Send + Sync {
    /// `None` if the user has never earned anything in this guild.
    async fn get_wallet(&self, user_id: u64, guild_id: u64)
        -> Result<Option<Wallet>, EconomyError>;

    /// Add `amount` to the balance, creating the wallet if needed.
    /// Returns the new balance.
    async fn add_to_balance(
        &self,
        user_id: u64,
        guild_id: u64,
        amount: i64,
    ) -> Result<i64, EconomyError>;

    /// Pay `amount` and stamp `last_daily = now` in one atomic step, but only
    /// if the last claim is at or before `cutoff` (or there was none).
    /// Returns the new balance, `None` while still on cooldown.
    async fn claim_daily(
        &self,
        user_id: u64,
        guild_id: u64,
        amount: i64,
        now: DateTime<Utc>,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<i64>, EconomyError>;

    /// Richest wallets first.
    async fn top_balances(&self, guild_id: u64, limit: usize)
        -> Result<Vec<Wallet>, EconomyError>;

    async fn delete_guild(&self, guild_id: u64) -> Result<u64, EconomyError>;
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct EconomyConfig {
    /// Credits paid per `/work` shift.
    pub work_reward: i64,

    /// Credits paid per daily claim.
    pub daily_reward: i64,

    /// Cooldown period for daily claims (in hours).
    pub daily_cooldown_hours: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            work_reward: 150,
            daily_reward: 500,
            daily_cooldown_hours: 24,
        }
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct EconomyService<S: WalletStore> {
    store: S,
    config: EconomyConfig,
}

impl<S: WalletStore> EconomyService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: EconomyConfig::default(),
        }
    }

    /// A user's balance, 0 if they have no wallet yet.
    pub async fn get_balance(&self, user_id: u64, guild_id: u64) -> Result<i64, EconomyError> {
        Ok(self
            .store
            .get_wallet(user_id, guild_id)
            .await?
            .map(|w| w.balance)
            .unwrap_or(0))
    }

    /// Credit a positive amount and return the new balance.
    pub async fn award_coins(
        &self,
        user_id: u64,
        guild_id: u64,
        amount: i64,
    ) -> Result<i64, EconomyError> {
        if amount <= 0 {
            return Err(EconomyError::InvalidAmount(amount));
        }
        self.store.add_to_balance(user_id, guild_id, amount).await
    }

    /// Pay out one work shift. The hourly limit is enforced by the command's
    /// cooldown, not here.
    pub async fn work(&self, user_id: u64, guild_id: u64) -> Result<WorkResult, EconomyError> {
        let earned = self.config.work_reward;
        let new_balance = self.award_coins(user_id, guild_id, earned).await?;
        tracing::debug!(user_id, guild_id, earned, new_balance, "Work shift paid");
        Ok(WorkResult {
            earned,
            new_balance,
        })
    }

    /// Attempt to claim the daily reward.
    ///
    /// Returns `Ok(None)` while still on cooldown.
    pub async fn claim_daily(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Option<DailyClaim>, EconomyError> {
        self.claim_daily_at(user_id, guild_id, Utc::now()).await
    }

    async fn claim_daily_at(
        &self,
        user_id: u64,
        guild_id: u64,
        now: DateTime<Utc>,
    ) -> Result<Option<DailyClaim>, EconomyError> {
        let cooldown = Duration::hours(self.config.daily_cooldown_hours);

        let Some(new_balance) = self
            .store
            .claim_daily(user_id, guild_id, self.config.daily_reward, now, now - cooldown)
            .await?
        else {
            return Ok(None);
        };

        tracing::debug!(user_id, guild_id, new_balance, "Daily reward claimed");

        Ok(Some(DailyClaim {
            coins_awarded: self.config.daily_reward,
            new_balance,
            next_claim_time: now + cooldown,
        }))
    }

    /// When the user may claim again, `None` if they never claimed.
    pub async fn next_daily_time(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Option<DateTime<Utc>>, EconomyError> {
        let wallet = self.store.get_wallet(user_id, guild_id).await?;
        Ok(wallet
            .and_then(|w| w.last_daily)
            .map(|last| last + Duration::hours(self.config.daily_cooldown_hours)))
    }

    pub async fn leaderboard(
        &self,
        guild_id: u64,
        limit: usize,
    ) -> Result<Vec<Wallet>, EconomyError> {
        self.store.top_balances(guild_id, limit).await
    }

    pub async fn purge_guild(&self, guild_id: u64) -> Result<u64, EconomyError> {
        self.store.delete_guild(guild_id).await
    }
}

// ============================================================================
// TESTS
// ============================================================================
