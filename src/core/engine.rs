use crate::core::events::EventChannel;
use crate::core::filter;
use crate::core::ranker::Ranker;
use crate::core::swipe::{SwipeOutcome, SwipeProcessor};
use crate::models::{RankedCandidate, SwipeDecision};
use crate::repo::{ChatRepository, InteractionRepository, ProfileRepository, RepoError};
use std::sync::Arc;
use thiserror::Error;

/// Errors the engine surfaces to its caller
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Store failure the caller may retry; the engine never retries.
    #[error("repository error: {0}")]
    Repository(String),
}

impl From<RepoError> for EngineError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => EngineError::NotFound(msg),
            RepoError::InvalidInput(msg) => EngineError::InvalidInput(msg),
            RepoError::Transient(msg) => EngineError::Repository(msg),
        }
    }
}

/// Matching engine facade
///
/// Wires the ranker, swipe processor, and unread counter over
/// constructor-injected repositories so the whole thing runs against fakes
/// in tests.
pub struct MatchEngine {
    profiles: Arc<dyn ProfileRepository>,
    interactions: Arc<dyn InteractionRepository>,
    chat: Arc<dyn ChatRepository>,
    ranker: Ranker,
    swipes: SwipeProcessor,
    events: EventChannel,
}

impl MatchEngine {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        interactions: Arc<dyn InteractionRepository>,
        chat: Arc<dyn ChatRepository>,
        ranker: Ranker,
    ) -> Self {
        let events = EventChannel::default();
        let swipes = SwipeProcessor::new(
            Arc::clone(&profiles),
            Arc::clone(&interactions),
            events.clone(),
        );
        Self {
            profiles,
            interactions,
            chat,
            ranker,
            swipes,
            events,
        }
    }

    /// Event channel callers subscribe to for match-created pushes
    pub fn events(&self) -> &EventChannel {
        &self.events
    }

    /// Rank candidates for a user, capped at min(limit, configured cap)
    ///
    /// Degrades to an empty list when the viewer has no profile or no
    /// candidates remain; only store failures surface as errors.
    pub async fn rank_candidates(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<RankedCandidate>, EngineError> {
        let viewer = match self.profiles.get_record(user_id).await {
            Ok(record) => record,
            Err(RepoError::NotFound(_)) => {
                tracing::warn!("Ranking requested for unknown user {}", user_id);
                return Ok(vec![]);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot = self.interactions.exclusion_snapshot(user_id).await?;
        let excluded = filter::excluded_ids(user_id, &snapshot);

        let candidates = self.profiles.list_records_except(&excluded).await?;
        tracing::debug!(
            "Ranking {} candidates for {} ({} excluded)",
            candidates.len(),
            user_id,
            excluded.len()
        );

        Ok(self.ranker.rank(&viewer, candidates, &excluded, limit))
    }

    /// Process a swipe; see [`SwipeProcessor::process`]
    pub async fn process_swipe(
        &self,
        actor_id: &str,
        target_id: &str,
        decision: SwipeDecision,
    ) -> Result<SwipeOutcome, EngineError> {
        self.swipes.process(actor_id, target_id, decision).await
    }

    /// Unread chat messages addressed to the user across their matches
    ///
    /// Pull-based aggregation; callers refresh periodically or when the
    /// realtime transport signals message activity.
    pub async fn unread_count(&self, user_id: &str) -> Result<u64, EngineError> {
        let matches = self.interactions.list_matches(user_id).await?;
        if matches.is_empty() {
            return Ok(0);
        }

        let match_ids: Vec<_> = matches.iter().map(|m| m.id).collect();
        let count = self.chat.count_unread(user_id, &match_ids).await?;
        Ok(count)
    }
}
