//! Collaborator contracts the engine is built against.
//!
//! Profile, interaction, and chat persistence live behind these traits so the
//! engine can run against the hosted backend and Postgres in production and
//! against the in-memory store in tests.

use crate::models::{ExclusionSnapshot, MatchRecord, SwipeAction, SwipeDecision, UserRecord};
use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by repository collaborators
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not found: {0}")]
    NotFound(String),

    /// Store or network failure the caller may retry; the engine does not
    /// retry internally.
    #[error("transient repository error: {0}")]
    Transient(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Outcome of recording a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeWrite {
    Recorded,
    /// An action for this ordered pair already exists; the write was a no-op.
    AlreadyRecorded,
}

/// Read-only access to profiles and preferences
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch a profile with its preferences. `RepoError::NotFound` for
    /// deleted or never-onboarded accounts.
    async fn get_record(&self, user_id: &str) -> Result<UserRecord, RepoError>;

    /// List all records except the given ids.
    async fn list_records_except(
        &self,
        exclude_ids: &HashSet<String>,
    ) -> Result<Vec<UserRecord>, RepoError>;
}

/// Swipes, matches, and block relations
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    /// Insert a swipe for the ordered (actor, target) pair. Must be
    /// insert-if-absent: a concurrent or repeated write for the same pair
    /// reports `AlreadyRecorded` instead of overwriting.
    async fn record_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        decision: SwipeDecision,
    ) -> Result<SwipeWrite, RepoError>;

    async fn find_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeAction>, RepoError>;

    async fn list_swiped_targets(&self, user_id: &str) -> Result<HashSet<String>, RepoError>;

    async fn list_matched_ids(&self, user_id: &str) -> Result<HashSet<String>, RepoError>;

    /// Ids blocked in either direction relative to the user.
    async fn list_blocked_ids(&self, user_id: &str) -> Result<HashSet<String>, RepoError>;

    /// Swiped, matched, and blocked ids read together so one ranking request
    /// sees one consistent view.
    async fn exclusion_snapshot(&self, user_id: &str) -> Result<ExclusionSnapshot, RepoError> {
        Ok(ExclusionSnapshot {
            swiped: self.list_swiped_targets(user_id).await?,
            matched: self.list_matched_ids(user_id).await?,
            blocked: self.list_blocked_ids(user_id).await?,
        })
    }

    /// Idempotent insert keyed on the canonical (low, high) pair. When a
    /// match already exists for the pair the existing record is returned;
    /// losing the reciprocal-swipe race is success, not an error.
    async fn create_match_if_absent(
        &self,
        user_a: &str,
        user_b: &str,
        score: u8,
    ) -> Result<MatchRecord, RepoError>;

    async fn find_match(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<MatchRecord>, RepoError>;

    async fn list_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, RepoError>;
}

/// Chat message store, external to the engine; only counted here
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Unread messages addressed to the user across the given matches.
    async fn count_unread(&self, user_id: &str, match_ids: &[Uuid]) -> Result<u64, RepoError>;
}
