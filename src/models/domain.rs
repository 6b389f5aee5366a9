use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Gender recorded on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Gender a user is willing to live with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderPreference {
    Male,
    Female,
    Any,
}

impl GenderPreference {
    /// Whether this preference accepts the given gender
    pub fn accepts(&self, gender: Gender) -> bool {
        match self {
            GenderPreference::Any => true,
            GenderPreference::Male => gender == Gender::Male,
            GenderPreference::Female => gender == Gender::Female,
        }
    }
}

/// Preference dimensions that carry a `flexible` wildcard value
pub trait Flexible {
    fn is_flexible(&self) -> bool;
}

macro_rules! flexible_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
            Flexible,
        }

        impl Flexible for $name {
            fn is_flexible(&self) -> bool {
                matches!(self, $name::Flexible)
            }
        }
    };
}

flexible_enum! {
    /// When the user wants to move in
    MoveInTimeline { Immediate, WithinOneMonth, OneToThreeMonths, ThreePlusMonths }
}

flexible_enum! {
    /// Pet situation the user wants in the home
    PetPreference { NoPets, CatsOnly, DogsOnly, AnyPets }
}

flexible_enum! {
    /// Smoking policy the user wants in the home
    SmokingPreference { NonSmoking, OutdoorOnly, SmokingOk }
}

flexible_enum! {
    /// Drinking habits the user is comfortable with
    DrinkingPreference { Never, Socially, Often }
}

flexible_enum! {
    /// How tidy the user keeps shared spaces
    CleanlinessLevel { Relaxed, Average, Tidy }
}

flexible_enum! {
    /// How social the user wants the household to be
    SocialLevel { Quiet, Balanced, Social }
}

/// User profile with display attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    pub age: u8,
    pub gender: Gender,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "photoIds", default)]
    pub photo_ids: Vec<String>,
    #[serde(rename = "isVerified", default)]
    pub is_verified: Option<bool>,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Helper to get is_verified as a bool, defaulting to false
    pub fn verified(&self) -> bool {
        self.is_verified.unwrap_or(false)
    }
}

fn default_true() -> bool {
    true
}

/// Housing and lifestyle preferences, one-to-one with a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "genderPreference")]
    pub gender_preference: GenderPreference,
    #[serde(rename = "budgetMin")]
    pub budget_min: u32,
    #[serde(rename = "budgetMax")]
    pub budget_max: u32,
    pub state: String,
    pub city: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(rename = "moveIn")]
    pub move_in: MoveInTimeline,
    pub pets: PetPreference,
    pub smoking: SmokingPreference,
    pub drinking: DrinkingPreference,
    pub cleanliness: CleanlinessLevel,
    pub social: SocialLevel,
}

impl UserPreferences {
    /// Budget range width, or None when min > max (malformed input)
    pub fn budget_range(&self) -> Option<u32> {
        if self.budget_min > self.budget_max {
            None
        } else {
            Some(self.budget_max - self.budget_min)
        }
    }
}

/// Profile plus preferences, the unit the scorer and ranker operate on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub profile: UserProfile,
    pub preferences: UserPreferences,
}

impl UserRecord {
    pub fn id(&self) -> &str {
        &self.profile.user_id
    }
}

/// Swipe decision reported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDecision {
    Like,
    Pass,
}

/// A recorded swipe, at most one per ordered (actor, target) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeAction {
    pub actor_id: String,
    pub target_id: String,
    pub decision: SwipeDecision,
    pub created_at: DateTime<Utc>,
}

/// Canonical ordering of a user pair, used as the match uniqueness key
pub fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// A mutual match, at most one per unordered user pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    pub user_low: String,
    pub user_high: String,
    pub compatibility_score: u8,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn involves(&self, user_id: &str) -> bool {
        self.user_low == user_id || self.user_high == user_id
    }

    /// The other side of the pair
    pub fn partner_of(&self, user_id: &str) -> Option<&str> {
        if self.user_low == user_id {
            Some(&self.user_high)
        } else if self.user_high == user_id {
            Some(&self.user_low)
        } else {
            None
        }
    }
}

/// Exclusion data read in a single consistent snapshot per ranking request
#[derive(Debug, Clone, Default)]
pub struct ExclusionSnapshot {
    pub swiped: HashSet<String>,
    pub matched: HashSet<String>,
    pub blocked: HashSet<String>,
}

/// Scored candidate produced by the ranker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub profile: UserProfile,
    pub score: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_preferences(user_id: &str) -> UserPreferences {
        UserPreferences {
            user_id: user_id.to_string(),
            gender_preference: GenderPreference::Any,
            budget_min: 1000,
            budget_max: 1500,
            state: "NY".to_string(),
            city: "New York City".to_string(),
            neighborhood: None,
            move_in: MoveInTimeline::Flexible,
            pets: PetPreference::Flexible,
            smoking: SmokingPreference::Flexible,
            drinking: DrinkingPreference::Flexible,
            cleanliness: CleanlinessLevel::Flexible,
            social: SocialLevel::Flexible,
        }
    }

    #[test]
    fn test_canonical_pair_orders_lexicographically() {
        assert_eq!(
            canonical_pair("bob", "alice"),
            ("alice".to_string(), "bob".to_string())
        );
        assert_eq!(
            canonical_pair("alice", "bob"),
            ("alice".to_string(), "bob".to_string())
        );
    }

    #[test]
    fn test_gender_preference_accepts() {
        assert!(GenderPreference::Any.accepts(Gender::Male));
        assert!(GenderPreference::Any.accepts(Gender::Female));
        assert!(GenderPreference::Female.accepts(Gender::Female));
        assert!(!GenderPreference::Female.accepts(Gender::Male));
    }

    #[test]
    fn test_budget_range_rejects_inverted_bounds() {
        let mut prefs = test_preferences("u1");
        assert_eq!(prefs.budget_range(), Some(500));

        prefs.budget_min = 2000;
        assert_eq!(prefs.budget_range(), None);
    }

    #[test]
    fn test_match_record_partner() {
        let record = MatchRecord {
            id: Uuid::new_v4(),
            user_low: "alice".to_string(),
            user_high: "bob".to_string(),
            compatibility_score: 80,
            created_at: Utc::now(),
        };

        assert_eq!(record.partner_of("alice"), Some("bob"));
        assert_eq!(record.partner_of("bob"), Some("alice"));
        assert_eq!(record.partner_of("carol"), None);
        assert!(record.involves("alice"));
        assert!(!record.involves("carol"));
    }
}
