// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "activity/activity_service.rs"]
pub mod activity;

#[path = "counting/counting_service.rs"]
pub mod counting;

#[path = "economy/mod.rs"]
pub mod economy;

#[path = "fun/fun_service.rs"]
pub mod fun;

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "settings/settings_service.rs"]
pub mod settings;

#[path = "welcome/welcome_service.rs"]
pub mod welcome;
