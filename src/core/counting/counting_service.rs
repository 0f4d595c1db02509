// This is the counting module - all the rules of the counting game live here.
// Like the other core modules it has NO Discord-specific code: the Discord
// layer hands us primitive IDs and the raw message text, and we hand back a
// `CountOutcome` describing what happened so it can react and reply.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Numbers that get a celebration card when reached.
pub const MILESTONES: [u64; 5] = [100, 500, 1000, 5000, 10000];

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// The persisted counting state of one guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingState {
    pub guild_id: u64,
    pub channel_id: u64,
    pub current_number: u64,
    /// Who posted `current_number`. `None` right after a reset.
    pub last_user: Option<u64>,
}

/// One row of the counting leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingScore {
    pub user_id: u64,
    pub count: u64,
}

/// What the service decided about a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountOutcome {
    /// Counting isn't set up, wrong channel, or the message isn't a number.
    Ignored,
    /// The number was the next one in the sequence.
    Accepted {
        number: u64,
        /// The author's total correct counts after this one.
        score: u64,
        milestone: bool,
    },
    /// The author also posted the previous number. The count was reset.
    SameUser,
    /// The number was not `expected`. The count was reset.
    WrongNumber { expected: u64, got: u64 },
}

/// The pure verdict on a message, before anything is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ignore,
    Accept(u64),
    RejectSameUser,
    RejectWrongNumber { expected: u64, got: u64 },
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CountingError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// STORAGE TRAIT
// ============================================================================

#[async_trait]
pub trait CountingStore: Send + Sync {
    async fn get_state(&self, guild_id: u64) -> Result<Option<CountingState>, CountingError>;

    /// Insert or replace the whole state for a guild.
    async fn save_state(&self, state: CountingState) -> Result<(), CountingError>;

    /// Set `current_number` and `last_user` for an already configured guild.
    async fn update_progress(
        &self,
        guild_id: u64,
        current_number: u64,
        last_user: Option<u64>,
    ) -> Result<(), CountingError>;

    /// Record an accepted count: move the guild to `number` with `user_id` as
    /// the last counter and credit them one point, both or neither.
    /// Returns the user's new score.
    async fn advance(&self, guild_id: u64, number: u64, user_id: u64)
        -> Result<u64, CountingError>;

    /// Highest scores first.
    async fn top_scores(
        &self,
        guild_id: u64,
        limit: usize,
    ) -> Result<Vec<CountingScore>, CountingError>;

    /// Remove the state and every score for the guild. Returns rows removed.
    async fn delete_guild(&self, guild_id: u64) -> Result<u64, CountingError>;
}

// ============================================================================
// RULES
// ============================================================================

/// Parse a counting message. Only plain ASCII digits count; anything else
/// (words, signs, spaces inside, numbers too large for u64) is ignored.
pub fn parse_count(content: &str) -> Option<u64> {
    let trimmed = content.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

pub fn is_milestone(number: u64) -> bool {
    MILESTONES.contains(&number)
}

/// Judge a message against the current state.
///
/// The same-user rule is checked before the number, so posting twice in a
/// row loses even when the second number would have been correct.
pub fn judge(state: &CountingState, author_id: u64, content: &str) -> Verdict {
    let Some(number) = parse_count(content) else {
        return Verdict::Ignore;
    };

    if state.last_user == Some(author_id) {
        return Verdict::RejectSameUser;
    }

    let expected = state.current_number.saturating_add(1);
    if number == expected {
        Verdict::Accept(number)
    } else {
        Verdict::RejectWrongNumber {
            expected,
            got: number,
        }
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct CountingService<S: CountingStore> {
    store: S,
    // One lock per guild so two correct guesses can't both be accepted.
    guild_locks: DashMap<u64, Arc<Mutex<()>>>,
}

impl<S: CountingStore> CountingService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            guild_locks: DashMap::new(),
        }
    }

    fn guild_lock(&self, guild_id: u64) -> Arc<Mutex<()>> {
        self.guild_locks
            .entry(guild_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Make `channel_id` the counting channel and start over from zero.
    pub async fn configure_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<CountingState, CountingError> {
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        let state = CountingState {
            guild_id,
            channel_id,
            current_number: 0,
            last_user: None,
        };
        self.store.save_state(state.clone()).await?;
        Ok(state)
    }

    pub async fn current_number(&self, guild_id: u64) -> Result<Option<u64>, CountingError> {
        Ok(self
            .store
            .get_state(guild_id)
            .await?
            .map(|state| state.current_number))
    }

    /// Run a guild message through the counting rules and persist the result.
    pub async fn process_message(
        &self,
        guild_id: u64,
        channel_id: u64,
        author_id: u64,
        content: &str,
    ) -> Result<CountOutcome, CountingError> {
        // Cheap reject before taking the lock: most messages aren't numbers.
        if parse_count(content).is_none() {
            return Ok(CountOutcome::Ignored);
        }

        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        let Some(state) = self.store.get_state(guild_id).await? else {
            return Ok(CountOutcome::Ignored);
        };
        if state.channel_id != channel_id {
            return Ok(CountOutcome::Ignored);
        }

        match judge(&state, author_id, content) {
            Verdict::Ignore => Ok(CountOutcome::Ignored),
            Verdict::Accept(number) => {
                let score = self.store.advance(guild_id, number, author_id).await?;

                tracing::debug!(guild_id, user_id = author_id, number, "Count accepted");

                Ok(CountOutcome::Accepted {
                    number,
                    score,
                    milestone: is_milestone(number),
                })
            }
            Verdict::RejectSameUser => {
                self.store.update_progress(guild_id, 0, None).await?;
                tracing::debug!(guild_id, user_id = author_id, "Count reset: same user");
                Ok(CountOutcome::SameUser)
            }
            Verdict::RejectWrongNumber { expected, got } => {
                self.store.update_progress(guild_id, 0, None).await?;
                tracing::debug!(
                    guild_id,
                    user_id = author_id,
                    expected,
                    got,
                    "Count reset: wrong number"
                );
                Ok(CountOutcome::WrongNumber { expected, got })
            }
        }
    }

    /// Reset the count to zero. Returns false if counting isn't configured.
    pub async fn reset(&self, guild_id: u64) -> Result<bool, CountingError> {
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;

        if self.store.get_state(guild_id).await?.is_none() {
            return Ok(false);
        }
        self.store.update_progress(guild_id, 0, None).await?;
        Ok(true)
    }

    pub async fn leaderboard(
        &self,
        guild_id: u64,
        limit: usize,
    ) -> Result<Vec<CountingScore>, CountingError> {
        self.store.top_scores(guild_id, limit).await
    }

    pub async fn purge_guild(&self, guild_id: u64) -> Result<u64, CountingError> {
        // The lock entry stays: another task may still hold a clone of it.
        let lock = self.guild_lock(guild_id);
        let _guard = lock.lock().await;
        self.store.delete_guild(guild_id).await
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct InMemoryCountingStore {
        states: StdMutex<HashMap<u64, CountingState>>,
        scores: StdMutex<HashMap<(u64, u64), u64>>,
    }

    #[async_trait]
    impl CountingStore for InMemoryCountingStore {
        async fn get_state(&self, guild_id: u64) -> Result<Option<CountingState>, CountingError> {
            Ok(self.states.lock().unwrap().get(&guild_id).cloned())
        }

        async fn save_state(&self, state: CountingState) -> Result<(), CountingError> {
            self.states.lock().unwrap().insert(state.guild_id, state);
            Ok(())
        }

        async fn update_progress(
            &self,
            guild_id: u64,
            current_number: u64,
            last_user: Option<u64>,
        ) -> Result<(), CountingError> {
            if let Some(state) = self.states.lock().unwrap().get_mut(&guild_id) {
                state.current_number = current_number;
                state.last_user = last_user;
            }
            Ok(())
        }

        async fn advance(
            &self,
            guild_id: u64,
            number: u64,
            user_id: u64,
        ) -> Result<u64, CountingError> {
            let mut states = self.states.lock().unwrap();
            let Some(state) = states.get_mut(&guild_id) else {
                return Err(CountingError::StorageError("no counting state".into()));
            };
            state.current_number = number;
            state.last_user = Some(user_id);

            let mut scores = self.scores.lock().unwrap();
            let entry = scores.entry((guild_id, user_id)).or_insert(0);
            *entry += 1;
            Ok(*entry)
        }

        async fn top_scores(
            &self,
            guild_id: u64,
            limit: usize,
        ) -> Result<Vec<CountingScore>, CountingError> {
            let scores = self.scores.lock().unwrap();
            let mut rows: Vec<CountingScore> = scores
                .iter()
                .filter(|((g, _), _)| *g == guild_id)
                .map(|((_, u), c)| CountingScore {
                    user_id: *u,
                    count: *c,
                })
                .collect();
            rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.user_id.cmp(&b.user_id)));
            rows.truncate(limit);
            Ok(rows)
        }

        async fn delete_guild(&self, guild_id: u64) -> Result<u64, CountingError> {
            let mut removed = 0;
            if self.states.lock().unwrap().remove(&guild_id).is_some() {
                removed += 1;
            }
            let mut scores = self.scores.lock().unwrap();
            let before = scores.len();
            scores.retain(|(g, _), _| *g != guild_id);
            Ok(removed + (before - scores.len()) as u64)
        }
    }

    fn state(current_number: u64, last_user: Option<u64>) -> CountingState {
        CountingState {
            guild_id: 1,
            channel_id: 10,
            current_number,
            last_user,
        }
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count("  7 \n"), Some(7));
        assert_eq!(parse_count("007"), Some(7));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("+1"), None);
        assert_eq!(parse_count("1 2"), None);
        assert_eq!(parse_count("twelve"), None);
        assert_eq!(parse_count("99999999999999999999999"), None);
    }

    #[test]
    fn test_judge_rules() {
        assert_eq!(judge(&state(0, None), 5, "1"), Verdict::Accept(1));
        assert_eq!(judge(&state(4, Some(6)), 5, "5"), Verdict::Accept(5));
        assert_eq!(
            judge(&state(4, Some(6)), 5, "7"),
            Verdict::RejectWrongNumber {
                expected: 5,
                got: 7
            }
        );
        assert_eq!(judge(&state(4, Some(6)), 5, "hello"), Verdict::Ignore);
    }

    #[test]
    fn test_same_user_checked_before_number() {
        // Correct next number, but the same person posted the previous one.
        assert_eq!(judge(&state(4, Some(5)), 5, "5"), Verdict::RejectSameUser);
        // Non-numeric messages from the same user are still ignored.
        assert_eq!(judge(&state(4, Some(5)), 5, "nice"), Verdict::Ignore);
    }

    #[test]
    fn test_milestones() {
        for n in MILESTONES {
            assert!(is_milestone(n));
        }
        assert!(!is_milestone(99));
        assert!(!is_milestone(200));
    }

    #[tokio::test]
    async fn test_ignored_when_not_configured_or_other_channel() {
        let service = CountingService::new(InMemoryCountingStore::default());

        let outcome = service.process_message(1, 10, 5, "1").await.unwrap();
        assert_eq!(outcome, CountOutcome::Ignored);

        service.configure_channel(1, 10).await.unwrap();
        let outcome = service.process_message(1, 11, 5, "1").await.unwrap();
        assert_eq!(outcome, CountOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_accepts_sequence_and_credits_score() {
        let service = CountingService::new(InMemoryCountingStore::default());
        service.configure_channel(1, 10).await.unwrap();

        let first = service.process_message(1, 10, 5, "1").await.unwrap();
        assert_eq!(
            first,
            CountOutcome::Accepted {
                number: 1,
                score: 1,
                milestone: false
            }
        );

        service.process_message(1, 10, 6, "2").await.unwrap();
        let third = service.process_message(1, 10, 5, "3").await.unwrap();
        assert_eq!(
            third,
            CountOutcome::Accepted {
                number: 3,
                score: 2,
                milestone: false
            }
        );

        let state = service.store.get_state(1).await.unwrap().unwrap();
        assert_eq!(state.current_number, 3);
        assert_eq!(state.last_user, Some(5));

        let board = service.leaderboard(1, 10).await.unwrap();
        assert_eq!(board[0], CountingScore { user_id: 5, count: 2 });
        assert_eq!(board[1], CountingScore { user_id: 6, count: 1 });
    }

    #[tokio::test]
    async fn test_wrong_number_resets() {
        let service = CountingService::new(InMemoryCountingStore::default());
        service.configure_channel(1, 10).await.unwrap();
        service.process_message(1, 10, 5, "1").await.unwrap();

        let outcome = service.process_message(1, 10, 6, "3").await.unwrap();
        assert_eq!(
            outcome,
            CountOutcome::WrongNumber {
                expected: 2,
                got: 3
            }
        );

        let state = service.store.get_state(1).await.unwrap().unwrap();
        assert_eq!(state.current_number, 0);
        assert_eq!(state.last_user, None);

        // After a reset the next number is 1 again, and anyone can post it.
        let outcome = service.process_message(1, 10, 5, "1").await.unwrap();
        assert!(matches!(outcome, CountOutcome::Accepted { number: 1, .. }));
    }

    #[tokio::test]
    async fn test_same_user_resets() {
        let service = CountingService::new(InMemoryCountingStore::default());
        service.configure_channel(1, 10).await.unwrap();
        service.process_message(1, 10, 5, "1").await.unwrap();

        let outcome = service.process_message(1, 10, 5, "2").await.unwrap();
        assert_eq!(outcome, CountOutcome::SameUser);
        assert_eq!(
            service.store.get_state(1).await.unwrap().unwrap().current_number,
            0
        );
    }

    #[tokio::test]
    async fn test_milestone_flagged() {
        let store = InMemoryCountingStore::default();
        store.save_state(state(99, Some(6))).await.unwrap();
        let service = CountingService::new(store);

        let outcome = service.process_message(1, 10, 5, "100").await.unwrap();
        assert_eq!(
            outcome,
            CountOutcome::Accepted {
                number: 100,
                score: 1,
                milestone: true
            }
        );
    }

    #[tokio::test]
    async fn test_concurrent_correct_guesses_only_one_wins() {
        let service = Arc::new(CountingService::new(InMemoryCountingStore::default()));
        service.configure_channel(1, 10).await.unwrap();

        let a = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.process_message(1, 10, 5, "1").await.unwrap() })
        };
        let b = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.process_message(1, 10, 6, "1").await.unwrap() })
        };
        let outcomes = [a.await.unwrap(), b.await.unwrap()];

        let accepted = outcomes
            .iter()
            .filter(|o| matches!(o, CountOutcome::Accepted { .. }))
            .count();
        assert_eq!(accepted, 1);
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, CountOutcome::SameUser | CountOutcome::WrongNumber { .. })));
    }

    #[tokio::test]
    async fn test_reset_and_purge() {
        let service = CountingService::new(InMemoryCountingStore::default());
        assert!(!service.reset(1).await.unwrap());

        service.configure_channel(1, 10).await.unwrap();
        service.process_message(1, 10, 5, "1").await.unwrap();
        assert!(service.reset(1).await.unwrap());
        assert_eq!(
            service.store.get_state(1).await.unwrap().unwrap().current_number,
            0
        );

        // One state row plus one score row.
        assert_eq!(service.purge_guild(1).await.unwrap(), 2);
        assert!(service.store.get_state(1).await.unwrap().is_none());
        assert!(service.leaderboard(1, 10).await.unwrap().is_empty());
        assert_eq!(service.current_number(1).await.unwrap(), None);

        // The guild can be set up again and still counts under one lock.
        service.configure_channel(1, 10).await.unwrap();
        assert_eq!(service.guild_locks.len(), 1);
        service.process_message(1, 10, 5, "1").await.unwrap();
        assert_eq!(service.current_number(1).await.unwrap(), Some(1));
    }
}
