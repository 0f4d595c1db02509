// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule, all sharing one pool.

#[path = "database.rs"]
pub mod database;

#[path = "activity/sqlite_activity_store.rs"]
pub mod activity;

#[path = "counting/sqlite_counting_store.rs"]
pub mod counting;

#[path = "economy/mod.rs"]
pub mod economy;

#[path = "moderation/sqlite_case_store.rs"]
pub mod moderation;

#[path = "settings/sqlite_settings_store.rs"]
pub mod settings;

#[path = "welcome/sqlite_join_store.rs"]
pub mod welcome;
