use crate::models::domain::{MatchRecord, RankedCandidate, UserProfile};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Candidate entry on the wire, profile fields flattened for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateView {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    pub age: u8,
    pub gender: String,
    pub occupation: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "photoIds")]
    pub photo_ids: Vec<String>,
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: u8,
}

impl From<RankedCandidate> for CandidateView {
    fn from(candidate: RankedCandidate) -> Self {
        let RankedCandidate { profile, score } = candidate;
        let is_verified = profile.verified();
        let gender = gender_label(&profile);
        Self {
            user_id: profile.user_id,
            first_name: profile.first_name,
            age: profile.age,
            gender,
            occupation: profile.occupation,
            bio: profile.bio,
            photo_ids: profile.photo_ids,
            is_verified,
            compatibility_score: score,
        }
    }
}

fn gender_label(profile: &UserProfile) -> String {
    match profile.gender {
        crate::models::domain::Gender::Male => "male".to_string(),
        crate::models::domain::Gender::Female => "female".to_string(),
    }
}

/// Response for the candidate ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankCandidatesResponse {
    pub candidates: Vec<CandidateView>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Match entry on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    pub id: Uuid,
    #[serde(rename = "userLow")]
    pub user_low: String,
    #[serde(rename = "userHigh")]
    pub user_high: String,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: u8,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<MatchRecord> for MatchView {
    fn from(record: MatchRecord) -> Self {
        Self {
            id: record.id,
            user_low: record.user_low,
            user_high: record.user_high,
            compatibility_score: record.compatibility_score,
            created_at: record.created_at,
        }
    }
}

/// Response for the swipe endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSwipeResponse {
    pub matched: bool,
    #[serde(rename = "match")]
    pub match_record: Option<MatchView>,
    #[serde(rename = "targetAvailable")]
    pub target_available: bool,
}

/// Response for the unread count endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub unread: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
