// Environment-driven configuration.
//
// `.env` is loaded by main before this runs, so everything here only looks at
// process variables. Parsing goes through a lookup closure so tests don't have
// to touch the real environment.

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/elura.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.")]
    MissingToken,
    #[error("{name} must be a numeric Discord ID, got {value:?}")]
    InvalidId { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub database_url: String,
    /// Role allowed to run `/setup`. Falls back to Administrator when unset.
    pub admin_role_id: Option<u64>,
    /// Role allowed to run the data-management commands.
    pub privacy_role_id: Option<u64>,
    /// Where command failures are reported for developers.
    pub dev_log_channel_id: Option<u64>,
    /// Commands are also registered here for instant updates during development.
    pub dev_guild_id: Option<u64>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let database_url = lookup("DATABASE_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        Ok(Self {
            discord_token,
            database_url,
            admin_role_id: parse_id(&lookup, "ADMIN_ROLE_ID")?,
            privacy_role_id: parse_id(&lookup, "PRIVACY_ROLE_ID")?,
            dev_log_channel_id: parse_id(&lookup, "DEV_LOG_CHANNEL_ID")?,
            dev_guild_id: parse_id(&lookup, "DEV_GUILD_ID")?,
        })
    }
}

fn parse_id<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidId { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_token_is_required() {
        assert_eq!(config_from(&[]).unwrap_err(), ConfigError::MissingToken);
        assert_eq!(
            config_from(&[("DISCORD_TOKEN", "  ")]).unwrap_err(),
            ConfigError::MissingToken
        );
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.admin_role_id, None);
        assert_eq!(config.privacy_role_id, None);
        assert_eq!(config.dev_log_channel_id, None);
        assert_eq!(config.dev_guild_id, None);
    }

    #[test]
    fn test_ids_are_parsed() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("DATABASE_URL", "sqlite://tmp/test.db"),
            ("ADMIN_ROLE_ID", "1234"),
            ("PRIVACY_ROLE_ID", " 5678 "),
            ("DEV_LOG_CHANNEL_ID", ""),
            ("DEV_GUILD_ID", "42"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite://tmp/test.db");
        assert_eq!(config.admin_role_id, Some(1234));
        assert_eq!(config.privacy_role_id, Some(5678));
        assert_eq!(config.dev_log_channel_id, None);
        assert_eq!(config.dev_guild_id, Some(42));
    }

    #[test]
    fn test_bad_id_is_rejected() {
        let err = config_from(&[("DISCORD_TOKEN", "abc"), ("ADMIN_ROLE_ID", "admins")])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidId {
                name: "ADMIN_ROLE_ID",
                value: "admins".to_string()
            }
        );
    }
}
