// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    canonical_pair, CleanlinessLevel, DrinkingPreference, ExclusionSnapshot, Flexible, Gender,
    GenderPreference, MatchRecord, MoveInTimeline, PetPreference, RankedCandidate, SmokingPreference,
    SocialLevel, SwipeAction, SwipeDecision, UserPreferences, UserProfile, UserRecord,
};
pub use requests::{ProcessSwipeRequest, RankCandidatesRequest};
pub use responses::{
    CandidateView, ErrorResponse, HealthResponse, MatchView, ProcessSwipeResponse,
    RankCandidatesResponse, UnreadCountResponse,
};
