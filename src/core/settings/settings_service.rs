// Per-guild settings: language and the channels other features post into.

use async_trait::async_trait;
use thiserror::Error;

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSettings {
    pub guild_id: u64,
    pub language: String,
    pub welcome_channel: Option<u64>,
    pub modlog_channel: Option<u64>,
}

impl GuildSettings {
    /// Settings of a guild that was never configured.
    pub fn defaults(guild_id: u64) -> Self {
        Self {
            guild_id,
            language: DEFAULT_LANGUAGE.to_string(),
            welcome_channel: None,
            modlog_channel: None,
        }
    }
}

/// A single column update. Each one leaves the other columns alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsUpdate {
    WelcomeChannel(Option<u64>),
    ModlogChannel(Option<u64>),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_settings(&self, guild_id: u64) -> Result<Option<GuildSettings>, SettingsError>;

    /// Insert default settings. Returns false if the guild already had a row.
    async fn insert_defaults(&self, guild_id: u64) -> Result<bool, SettingsError>;

    /// Apply one update, creating the row with defaults if needed.
    async fn apply(&self, guild_id: u64, update: SettingsUpdate) -> Result<(), SettingsError>;

    async fn delete_guild(&self, guild_id: u64) -> Result<u64, SettingsError>;
}

pub struct SettingsService<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> SettingsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get(&self, guild_id: u64) -> Result<GuildSettings, SettingsError> {
        Ok(self
            .store
            .get_settings(guild_id)
            .await?
            .unwrap_or_else(|| GuildSettings::defaults(guild_id)))
    }

    /// Returns true if the guild was newly registered.
    pub async fn register_guild(&self, guild_id: u64) -> Result<bool, SettingsError> {
        self.store.insert_defaults(guild_id).await
    }

    pub async fn set_welcome_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<(), SettingsError> {
        self.store
            .apply(guild_id, SettingsUpdate::WelcomeChannel(Some(channel_id)))
            .await
    }

    pub async fn clear_welcome_channel(&self, guild_id: u64) -> Result<(), SettingsError> {
        self.store
            .apply(guild_id, SettingsUpdate::WelcomeChannel(None))
            .await
    }

    pub async fn set_modlog_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<(), SettingsError> {
        self.store
            .apply(guild_id, SettingsUpdate::ModlogChannel(Some(channel_id)))
            .await
    }

    pub async fn purge_guild(&self, guild_id: u64) -> Result<u64, SettingsError> {
        self.store.delete_guild(guild_id).await
    }
}
