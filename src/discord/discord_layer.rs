// Discord layer - commands and event handlers.
//
// Everything in here translates between serenity/poise types and the core
// services. Business rules stay in core.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "checks.rs"]
pub mod checks;

#[path = "embeds.rs"]
pub mod embeds;

#[path = "error_handler.rs"]
pub mod error_handler;

#[path = "events.rs"]
pub mod events;

#[path = "moderation/commands.rs"]
pub mod moderation;

use crate::config::BotConfig;
use crate::core::activity::ActivityService;
use crate::core::counting::CountingService;
use crate::core::economy::EconomyService;
use crate::core::moderation::ModerationService;
use crate::core::settings::SettingsService;
use crate::core::welcome::WelcomeService;
use crate::infra::activity::SqliteActivityStore;
use crate::infra::counting::SqliteCountingStore;
use crate::infra::economy::SqliteWalletStore;
use crate::infra::moderation::SqliteCaseStore;
use crate::infra::settings::SqliteSettingsStore;
use crate::infra::welcome::SqliteJoinStore;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;

// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub config: BotConfig,
    pub pool: Pool<Sqlite>,
    pub counting: Arc<CountingService<SqliteCountingStore>>,
    pub economy: Arc<EconomyService<SqliteWalletStore>>,
    pub moderation: Arc<ModerationService<SqliteCaseStore>>,
    pub activity: Arc<ActivityService<SqliteActivityStore>>,
    pub settings: Arc<SettingsService<SqliteSettingsStore>>,
    pub welcome: Arc<WelcomeService<SqliteJoinStore>>,
}

impl Data {
    /// Wire every service to its SQLite store on the shared pool.
    pub fn new(config: BotConfig, pool: Pool<Sqlite>) -> Self {
        Self {
            counting: Arc::new(CountingService::new(SqliteCountingStore::new(pool.clone()))),
            economy: Arc::new(EconomyService::new(SqliteWalletStore::new(pool.clone()))),
            moderation: Arc::new(ModerationService::new(SqliteCaseStore::new(pool.clone()))),
            activity: Arc::new(ActivityService::new(SqliteActivityStore::new(pool.clone()))),
            settings: Arc::new(SettingsService::new(SqliteSettingsStore::new(pool.clone()))),
            welcome: Arc::new(WelcomeService::new(SqliteJoinStore::new(pool.clone()))),
            config,
            pool,
        }
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
