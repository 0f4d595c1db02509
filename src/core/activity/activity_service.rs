// Message activity tracking - a running message total per member.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub user_id: u64,
    pub guild_id: u64,
    pub count: u64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Add one message to the member's total and return the new total.
    async fn increment(
        &self,
        user_id: u64,
        guild_id: u64,
        at: DateTime<Utc>,
    ) -> Result<u64, ActivityError>;

    async fn get_entry(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Option<ActivityEntry>, ActivityError>;

    /// Most active members first.
    async fn top_entries(
        &self,
        guild_id: u64,
        limit: usize,
    ) -> Result<Vec<ActivityEntry>, ActivityError>;

    async fn delete_guild(&self, guild_id: u64) -> Result<u64, ActivityError>;
}

pub struct ActivityService<S: ActivityStore> {
    store: S,
}

impl<S: ActivityStore> ActivityService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn record_message(&self, user_id: u64, guild_id: u64) -> Result<u64, ActivityError> {
        self.store.increment(user_id, guild_id, Utc::now()).await
    }

    pub async fn message_count(&self, user_id: u64, guild_id: u64) -> Result<u64, ActivityError> {
        Ok(self
            .store
            .get_entry(user_id, guild_id)
            .await?
            .map(|e| e.count)
            .unwrap_or(0))
    }

    pub async fn leaderboard(
        &self,
        guild_id: u64,
        limit: usize,
    ) -> Result<Vec<ActivityEntry>, ActivityError> {
        self.store.top_entries(guild_id, limit).await
    }

    pub async fn purge_guild(&self, guild_id: u64) -> Result<u64, ActivityError> {
        self.store.delete_guild(guild_id).await
    }
}
