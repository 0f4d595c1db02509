// Member join log. The welcome card itself is rendered by the Discord layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberJoin {
    pub guild_id: u64,
    pub user_id: u64,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum WelcomeError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[async_trait]
pub trait JoinStore: Send + Sync {
    async fn insert_join(&self, join: MemberJoin) -> Result<(), WelcomeError>;
    async fn count_joins(&self, guild_id: u64) -> Result<u64, WelcomeError>;
    async fn delete_guild(&self, guild_id: u64) -> Result<u64, WelcomeError>;
}

pub struct WelcomeService<S: JoinStore> {
    store: S,
}

impl<S: JoinStore> WelcomeService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn record_join(
        &self,
        guild_id: u64,
        user_id: u64,
        username: &str,
    ) -> Result<MemberJoin, WelcomeError> {
        let join = MemberJoin {
            guild_id,
            user_id,
            username: username.to_string(),
            joined_at: Utc::now(),
        };
        self.store.insert_join(join.clone()).await?;
        Ok(join)
    }

    pub async fn joins_count(&self, guild_id: u64) -> Result<u64, WelcomeError> {
        self.store.count_joins(guild_id).await
    }

    pub async fn purge_guild(&self, guild_id: u64) -> Result<u64, WelcomeError> {
        self.store.delete_guild(guild_id).await
    }
}
