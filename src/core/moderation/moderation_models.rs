// Moderation domain models - data structures for the case log.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer performs the actual kick/ban/timeout and then records it
// here as a case.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Reason stored when the moderator didn't give one.
pub const DEFAULT_REASON: &str = "No reason provided";

/// Longest timeout the platform accepts: 28 days.
pub const MAX_TIMEOUT_MINUTES: u32 = 28 * 24 * 60;

/// What kind of action a case records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseType {
    Warning,
    Kick,
    Ban,
    Timeout { minutes: u32 },
    Unban,
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseType::Warning => write!(f, "Warning"),
            CaseType::Kick => write!(f, "Kick"),
            CaseType::Ban => write!(f, "Ban"),
            CaseType::Timeout { minutes } => write!(f, "Timeout ({}m)", minutes),
            CaseType::Unban => write!(f, "Unban"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown case type: {0}")]
pub struct ParseCaseTypeError(pub String);

impl FromStr for CaseType {
    type Err = ParseCaseTypeError;

    /// Parses the labels produced by `Display`, which is how case types are
    /// stored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Warning" => Ok(CaseType::Warning),
            "Kick" => Ok(CaseType::Kick),
            "Ban" => Ok(CaseType::Ban),
            "Unban" => Ok(CaseType::Unban),
            other => other
                .strip_prefix("Timeout (")
                .and_then(|rest| rest.strip_suffix("m)"))
                .and_then(|minutes| minutes.parse().ok())
                .map(|minutes| CaseType::Timeout { minutes })
                .ok_or_else(|| ParseCaseTypeError(other.to_string())),
        }
    }
}

/// A case as it is about to be written. The store assigns `case_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCase {
    pub guild_id: u64,
    pub case_type: CaseType,
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// A recorded moderation case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModCase {
    pub guild_id: u64,
    /// Sequential per guild, starting at 1.
    pub case_id: u64,
    pub case_type: CaseType,
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl ModCase {
    /// Timestamp in the `YYYY-MM-DD HH:MM:SS` form shown on case cards.
    pub fn timestamp_label(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_case_type_labels_round_trip() {
        let types = [
            CaseType::Warning,
            CaseType::Kick,
            CaseType::Ban,
            CaseType::Timeout { minutes: 15 },
            CaseType::Unban,
        ];
        for case_type in types {
            assert_eq!(case_type.to_string().parse::<CaseType>(), Ok(case_type));
        }
        assert_eq!(CaseType::Timeout { minutes: 5 }.to_string(), "Timeout (5m)");
    }

    #[test]
    fn test_unknown_case_type() {
        assert!("Mute".parse::<CaseType>().is_err());
        assert!("Timeout (abcm)".parse::<CaseType>().is_err());
    }

    #[test]
    fn test_timestamp_label() {
        let case = ModCase {
            guild_id: 1,
            case_id: 1,
            case_type: CaseType::Warning,
            user_id: 2,
            moderator_id: 3,
            reason: DEFAULT_REASON.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap(),
        };
        assert_eq!(case.timestamp_label(), "2025-03-04 05:06:07");
    }
}
