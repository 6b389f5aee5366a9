// Unit tests for Roomio Algo scoring and filtering

use chrono::Utc;
use roomio_algo::core::{compatibility_score, excluded_ids, Ranker};
use roomio_algo::models::{
    CleanlinessLevel, DrinkingPreference, ExclusionSnapshot, Gender, GenderPreference,
    MoveInTimeline, PetPreference, SmokingPreference, SocialLevel, UserPreferences, UserProfile,
    UserRecord,
};
use std::collections::HashSet;

fn base_record(id: &str, gender: Gender) -> UserRecord {
    UserRecord {
        profile: UserProfile {
            user_id: id.to_string(),
            first_name: format!("User {}", id),
            age: 28,
            gender,
            occupation: None,
            bio: None,
            photo_ids: vec![],
            is_verified: Some(false),
            is_active: true,
            created_at: Some(Utc::now()),
        },
        preferences: UserPreferences {
            user_id: id.to_string(),
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
        },
    }
}

#[test]
fn test_score_within_bounds_and_symmetric() {
    let mut a = base_record("a", Gender::Female);
    let mut b = base_record("b", Gender::Male);
    a.preferences.budget_min = 700;
    a.preferences.budget_max = 900;
    b.preferences.city = "Albany".to_string();
    b.preferences.pets = PetPreference::CatsOnly;
    a.preferences.pets = PetPreference::DogsOnly;

    let ab = compatibility_score(&a, &b);
    let ba = compatibility_score(&b, &a);

    assert!(ab <= 100);
    assert_eq!(ab, ba);
}

#[test]
fn test_perfectly_aligned_pair_scores_100() {
    let a = base_record("a", Gender::Female);
    let b = base_record("b", Gender::Male);

    assert_eq!(compatibility_score(&a, &b), 100);
}

#[test]
fn test_known_pair_scores_deterministically() {
    // User A: budget 1000-1500, NY/NYC, gender pref any, all lifestyle
    // flexible. User B: budget 1200-1800, NY/NYC, prefers any.
    // gender 20 + budget round(20*300/550)=11 + location 15 + move-in 10
    // + pets 10 + smoking 10 + drinking 5 + cleanliness 5 + social 5 = 91
    let a = base_record("a", Gender::Male);
    let mut b = base_record("b", Gender::Female);
    b.preferences.budget_min = 1200;
    b.preferences.budget_max = 1800;
    b.preferences.pets = PetPreference::NoPets;
    b.preferences.smoking = SmokingPreference::NonSmoking;
    b.preferences.drinking = DrinkingPreference::Socially;
    b.preferences.cleanliness = CleanlinessLevel::Tidy;
    b.preferences.social = SocialLevel::Balanced;

    assert_eq!(compatibility_score(&a, &b), 91);
}

#[test]
fn test_hard_mismatches_leave_only_soft_terms() {
    // Disjoint budgets, different states and cities, gender preferences
    // mismatched both ways: those three terms contribute nothing.
    let mut a = base_record("a", Gender::Female);
    let mut b = base_record("b", Gender::Female);
    a.preferences.gender_preference = GenderPreference::Male;
    b.preferences.gender_preference = GenderPreference::Male;
    a.preferences.budget_min = 400;
    a.preferences.budget_max = 600;
    a.preferences.state = "TX".to_string();
    a.preferences.city = "Austin".to_string();

    // move-in 10 + pets 10 + smoking 10 + drinking 5 + cleanliness 5 + social 5
    assert_eq!(compatibility_score(&a, &b), 45);
}

#[test]
fn test_excluded_ids_union() {
    let snapshot = ExclusionSnapshot {
        swiped: ["s1".to_string()].into_iter().collect(),
        matched: ["m1".to_string()].into_iter().collect(),
        blocked: ["b1".to_string(), "s1".to_string()].into_iter().collect(),
    };

    let excluded = excluded_ids("me", &snapshot);

    let expected: HashSet<String> = ["me", "s1", "m1", "b1"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(excluded, expected);
}

#[test]
fn test_ranker_never_returns_excluded_profiles() {
    let ranker = Ranker::default();
    let viewer = base_record("viewer", Gender::Female);

    let candidates = vec![
        base_record("viewer", Gender::Female),
        base_record("blocked", Gender::Male),
        base_record("ok", Gender::Male),
    ];
    let excluded: HashSet<String> = ["viewer", "blocked"].into_iter().map(str::to_string).collect();

    let ranked = ranker.rank(&viewer, candidates, &excluded, 20);

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].profile.user_id, "ok");
}

#[test]
fn test_ranker_caps_at_twenty() {
    let ranker = Ranker::default();
    let viewer = base_record("viewer", Gender::Female);

    let candidates: Vec<UserRecord> = (0..40)
        .map(|i| base_record(&format!("c{:02}", i), Gender::Male))
        .collect();
    let excluded: HashSet<String> = ["viewer".to_string()].into_iter().collect();

    let ranked = ranker.rank(&viewer, candidates, &excluded, 100);

    assert_eq!(ranked.len(), 20);
    for window in ranked.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
}
