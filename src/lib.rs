//! Roomio Algo - matching engine service for the Roomio roommate app
//!
//! This library provides the compatibility scoring, candidate ranking, and
//! swipe/match processing used by the Roomio mobile app. Persistence lives
//! behind repository traits so the engine runs against the hosted backend
//! and Postgres in production and in-memory fakes in tests.

pub mod config;
pub mod core;
pub mod models;
pub mod repo;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{compatibility_score, EngineError, EngineEvent, MatchEngine, Ranker, SwipeOutcome};
pub use models::{
    MatchRecord, RankedCandidate, SwipeDecision, UserPreferences, UserProfile, UserRecord,
};
pub use repo::{ChatRepository, InteractionRepository, ProfileRepository, RepoError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let (low, high) = models::canonical_pair("zoe", "amir");
        assert_eq!((low.as_str(), high.as_str()), ("amir", "zoe"));
    }
}
