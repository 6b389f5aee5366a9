use crate::core::scoring::compatibility_score;
use crate::models::{RankedCandidate, UserRecord};
use std::collections::HashSet;

/// Default cap on the number of candidates returned per request
pub const DEFAULT_CANDIDATE_LIMIT: usize = 20;

/// Candidate ranker: exclusion filtering, pairwise scoring, ordering, cap
///
/// All work is read-only over data already in memory, so ranking requests
/// can run with unbounded parallelism.
#[derive(Debug, Clone)]
pub struct Ranker {
    limit: usize,
}

impl Ranker {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Rank candidates for a user
    ///
    /// Drops excluded and inactive profiles, scores the rest against the
    /// viewer, sorts by descending score with profile id as the stable
    /// tie-break, and caps the result. An empty result is a normal terminal
    /// state, not an error.
    pub fn rank(
        &self,
        viewer: &UserRecord,
        candidates: Vec<UserRecord>,
        excluded: &HashSet<String>,
        limit: usize,
    ) -> Vec<RankedCandidate> {
        let cap = limit.min(self.limit);

        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .filter(|candidate| !excluded.contains(candidate.id()))
            .filter(|candidate| candidate.profile.is_active)
            .map(|candidate| {
                let score = compatibility_score(viewer, &candidate);
                RankedCandidate {
                    profile: candidate.profile,
                    score,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.profile.user_id.cmp(&b.profile.user_id))
        });

        ranked.truncate(cap);
        ranked
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_CANDIDATE_LIMIT)
    }
}
