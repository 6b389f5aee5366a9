use crate::core::engine::EngineError;
use crate::core::events::{EngineEvent, EventChannel};
use crate::core::scoring::compatibility_score;
use crate::models::{MatchRecord, SwipeDecision};
use crate::repo::{InteractionRepository, ProfileRepository, RepoError, SwipeWrite};
use std::sync::Arc;

/// Result of processing a swipe
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    pub matched: bool,
    pub record: Option<MatchRecord>,
    /// False when the target's account disappeared before match creation;
    /// the swipe itself is still recorded.
    pub target_available: bool,
}

impl SwipeOutcome {
    fn no_match() -> Self {
        Self {
            matched: false,
            record: None,
            target_available: true,
        }
    }

    fn target_gone() -> Self {
        Self {
            matched: false,
            record: None,
            target_available: false,
        }
    }

    fn matched(record: MatchRecord) -> Self {
        Self {
            matched: true,
            record: Some(record),
            target_available: true,
        }
    }
}

/// Swipe processor: records decisions and creates matches on reciprocity
///
/// Per ordered (actor, target) pair the processor is a small state machine:
/// no action -> passed, or no action -> liked -> matched once a reciprocal
/// like is found. A prior swipe on the same target is an idempotent no-op
/// that reports the existing state without re-evaluating reciprocity.
///
/// Two users liking each other concurrently is the one real race here. The
/// match insert is keyed on the canonical pair and idempotent at the
/// repository, so whichever task loses the race receives the existing record
/// and reports success; exactly one match row ever exists per pair.
pub struct SwipeProcessor {
    profiles: Arc<dyn ProfileRepository>,
    interactions: Arc<dyn InteractionRepository>,
    events: EventChannel,
}

impl SwipeProcessor {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        interactions: Arc<dyn InteractionRepository>,
        events: EventChannel,
    ) -> Self {
        Self {
            profiles,
            interactions,
            events,
        }
    }

    /// Process a swipe decision
    pub async fn process(
        &self,
        actor_id: &str,
        target_id: &str,
        decision: SwipeDecision,
    ) -> Result<SwipeOutcome, EngineError> {
        if actor_id == target_id {
            return Err(EngineError::InvalidInput(
                "actor and target must differ".to_string(),
            ));
        }

        if self.interactions.find_swipe(actor_id, target_id).await?.is_some() {
            return self.existing_state(actor_id, target_id).await;
        }

        let write = self
            .interactions
            .record_swipe(actor_id, target_id, decision)
            .await?;
        if write == SwipeWrite::AlreadyRecorded {
            // Lost a same-direction race; report the state that won
            return self.existing_state(actor_id, target_id).await;
        }

        tracing::debug!(
            "Recorded swipe: {} -> {} ({:?})",
            actor_id,
            target_id,
            decision
        );

        if decision == SwipeDecision::Pass {
            return Ok(SwipeOutcome::no_match());
        }

        let reciprocal = self.interactions.find_swipe(target_id, actor_id).await?;
        match reciprocal {
            Some(action) if action.decision == SwipeDecision::Like => {
                self.create_match(actor_id, target_id).await
            }
            _ => Ok(SwipeOutcome::no_match()),
        }
    }

    /// State reported for a duplicate swipe: matched iff a match exists
    async fn existing_state(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<SwipeOutcome, EngineError> {
        match self.interactions.find_match(actor_id, target_id).await? {
            Some(record) => Ok(SwipeOutcome::matched(record)),
            None => Ok(SwipeOutcome::no_match()),
        }
    }

    async fn create_match(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<SwipeOutcome, EngineError> {
        // Both records are needed for the stored score; a deleted account
        // skips match creation but keeps the swipe.
        let actor = match self.profiles.get_record(actor_id).await {
            Ok(record) => record,
            Err(RepoError::NotFound(_)) => {
                tracing::warn!("Actor profile {} gone before match creation", actor_id);
                return Ok(SwipeOutcome::target_gone());
            }
            Err(e) => return Err(e.into()),
        };
        let target = match self.profiles.get_record(target_id).await {
            Ok(record) => record,
            Err(RepoError::NotFound(_)) => {
                tracing::warn!("Target profile {} gone before match creation", target_id);
                return Ok(SwipeOutcome::target_gone());
            }
            Err(e) => return Err(e.into()),
        };

        let score = compatibility_score(&actor, &target);
        let record = self
            .interactions
            .create_match_if_absent(actor_id, target_id, score)
            .await?;

        tracing::info!(
            "Match created: {} <-> {} (score {})",
            record.user_low,
            record.user_high,
            record.compatibility_score
        );

        self.events.publish(EngineEvent::MatchCreated {
            record: record.clone(),
        });

        Ok(SwipeOutcome::matched(record))
    }
}
