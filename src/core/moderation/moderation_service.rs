// Moderation service - core business logic for the case log.
//
// This service handles:
// - Validating moderator input (timeout length, empty reasons)
// - Writing cases with sequential per-guild IDs
// - Looking cases up again for /case and /cases
//
// NO Discord dependencies here - just pure domain logic.

use super::moderation_models::{CaseType, ModCase, NewCase, DEFAULT_REASON, MAX_TIMEOUT_MINUTES};
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Timeout must be between 1 and 40320 minutes, got {0}")]
    InvalidDuration(u32),

    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Write a case, allocating the next case ID for its guild in the same
    /// step so concurrent inserts never share an ID.
    async fn insert_case(&self, case: NewCase) -> Result<ModCase, ModerationError>;

    async fn get_case(&self, guild_id: u64, case_id: u64)
        -> Result<Option<ModCase>, ModerationError>;

    /// Newest first.
    async fn cases_for_user(
        &self,
        guild_id: u64,
        user_id: u64,
        limit: usize,
    ) -> Result<Vec<ModCase>, ModerationError>;

    async fn delete_guild(&self, guild_id: u64) -> Result<u64, ModerationError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ModerationService<S: CaseStore> {
    store: S,
}

impl<S: CaseStore> ModerationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record an action that has already been carried out.
    pub async fn log_case(
        &self,
        guild_id: u64,
        case_type: CaseType,
        user_id: u64,
        moderator_id: u64,
        reason: Option<&str>,
    ) -> Result<ModCase, ModerationError> {
        if let CaseType::Timeout { minutes } = case_type {
            validate_timeout(minutes)?;
        }

        let reason = normalize_reason(reason);
        let case = self
            .store
            .insert_case(NewCase {
                guild_id,
                case_type,
                user_id,
                moderator_id,
                reason,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            guild_id,
            case_id = case.case_id,
            user_id,
            moderator_id,
            case_type = %case.case_type,
            "Moderation case logged"
        );

        Ok(case)
    }

    pub async fn get_case(
        &self,
        guild_id: u64,
        case_id: u64,
    ) -> Result<Option<ModCase>, ModerationError> {
        self.store.get_case(guild_id, case_id).await
    }

    pub async fn cases_for_user(
        &self,
        guild_id: u64,
        user_id: u64,
        limit: usize,
    ) -> Result<Vec<ModCase>, ModerationError> {
        self.store.cases_for_user(guild_id, user_id, limit).await
    }

    pub async fn purge_guild(&self, guild_id: u64) -> Result<u64, ModerationError> {
        self.store.delete_guild(guild_id).await
    }
}

/// Check a timeout length before the Discord layer applies it.
pub fn validate_timeout(minutes: u32) -> Result<u32, ModerationError> {
    if minutes == 0 || minutes > MAX_TIMEOUT_MINUTES {
        Err(ModerationError::InvalidDuration(minutes))
    } else {
        Ok(minutes)
    }
}

/// Blank reasons are stored as the default text.
pub fn normalize_reason(reason: Option<&str>) -> String {
    match reason.map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => DEFAULT_REASON.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryCaseStore {
        cases: Mutex<Vec<ModCase>>,
    }

    #[async_trait]
    impl CaseStore for InMemoryCaseStore {
        async fn insert_case(&self, case: NewCase) -> Result<ModCase, ModerationError> {
            let mut cases = self.cases.lock().unwrap();
            let next_id = cases
                .iter()
                .filter(|c| c.guild_id == case.guild_id)
                .map(|c| c.case_id)
                .max()
                .unwrap_or(0)
                + 1;
            let stored = ModCase {
                guild_id: case.guild_id,
                case_id: next_id,
                case_type: case.case_type,
                user_id: case.user_id,
                moderator_id: case.moderator_id,
                reason: case.reason,
                created_at: case.created_at,
            };
            cases.push(stored.clone());
            Ok(stored)
        }

        async fn get_case(
            &self,
            guild_id: u64,
            case_id: u64,
        ) -> Result<Option<ModCase>, ModerationError> {
            Ok(self
                .cases
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.guild_id == guild_id && c.case_id == case_id)
                .cloned())
        }

        async fn cases_for_user(
            &self,
            guild_id: u64,
            user_id: u64,
            limit: usize,
        ) -> Result<Vec<ModCase>, ModerationError> {
            Ok(self
                .cases
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|c| c.guild_id == guild_id && c.user_id == user_id)
                .take(limit)
                .cloned()
                .collect())
        }

        async fn delete_guild(&self, guild_id: u64) -> Result<u64, ModerationError> {
            let mut cases = self.cases.lock().unwrap();
            let before = cases.len();
            cases.retain(|c| c.guild_id != guild_id);
            Ok((before - cases.len()) as u64)
        }
    }

    #[test]
    fn test_validate_timeout() {
        assert!(validate_timeout(1).is_ok());
        assert!(validate_timeout(40320).is_ok());
        assert!(matches!(
            validate_timeout(0),
            Err(ModerationError::InvalidDuration(0))
        ));
        assert!(validate_timeout(40321).is_err());
    }

    #[test]
    fn test_normalize_reason() {
        assert_eq!(normalize_reason(None), DEFAULT_REASON);
        assert_eq!(normalize_reason(Some("   ")), DEFAULT_REASON);
        assert_eq!(normalize_reason(Some(" spam ")), "spam");
    }

    #[tokio::test]
    async fn test_case_ids_are_sequential_per_guild() {
        let service = ModerationService::new(InMemoryCaseStore::default());

        let a = service
            .log_case(1, CaseType::Warning, 10, 99, Some("rude"))
            .await
            .unwrap();
        let b = service
            .log_case(1, CaseType::Kick, 11, 99, None)
            .await
            .unwrap();
        let other = service
            .log_case(2, CaseType::Ban, 10, 99, None)
            .await
            .unwrap();

        assert_eq!(a.case_id, 1);
        assert_eq!(b.case_id, 2);
        assert_eq!(other.case_id, 1);
        assert_eq!(b.reason, DEFAULT_REASON);
    }

    #[tokio::test]
    async fn test_invalid_timeout_is_not_logged() {
        let service = ModerationService::new(InMemoryCaseStore::default());

        let result = service
            .log_case(1, CaseType::Timeout { minutes: 0 }, 10, 99, None)
            .await;
        assert!(result.is_err());
        assert!(service.get_case(1, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_and_purge() {
        let service = ModerationService::new(InMemoryCaseStore::default());
        service
            .log_case(1, CaseType::Warning, 10, 99, Some("first"))
            .await
            .unwrap();
        service
            .log_case(1, CaseType::Timeout { minutes: 30 }, 10, 99, Some("second"))
            .await
            .unwrap();
        service
            .log_case(1, CaseType::Warning, 11, 99, None)
            .await
            .unwrap();

        let history = service.cases_for_user(1, 10, 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reason, "second");

        let case = service.get_case(1, 2).await.unwrap().unwrap();
        assert_eq!(case.case_type, CaseType::Timeout { minutes: 30 });

        assert_eq!(service.purge_guild(1).await.unwrap(), 3);
        assert!(service.cases_for_user(1, 10, 10).await.unwrap().is_empty());
    }
}
