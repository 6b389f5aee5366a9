use crate::models::{Flexible, GenderPreference, UserPreferences, UserRecord};

/// Points carried by each scoring term. The terms sum to exactly 100.
pub const GENDER_POINTS: u32 = 20;
pub const BUDGET_POINTS: u32 = 20;
pub const STATE_POINTS: u32 = 5;
pub const CITY_POINTS: u32 = 10;
pub const MOVE_IN_POINTS: u32 = 10;
pub const PETS_POINTS: u32 = 10;
pub const SMOKING_POINTS: u32 = 10;
pub const DRINKING_POINTS: u32 = 5;
pub const CLEANLINESS_POINTS: u32 = 5;
pub const SOCIAL_POINTS: u32 = 5;

pub const MAX_SCORE: u32 = 100;

/// Calculate the compatibility score (0-100) between two users
///
/// Scoring terms:
///     gender compatibility      0 or 20
///     budget overlap            0-20, proportional to shared range
///     location                  +5 same state, +10 same city
///     move-in timeline          0 or 10
///     pets / smoking            0 or 10 each
///     drinking / cleanliness / social   0 or 5 each
///
/// Pure and symmetric: `compatibility_score(a, b) == compatibility_score(b, a)`.
pub fn compatibility_score(a: &UserRecord, b: &UserRecord) -> u8 {
    let total = gender_term(a, b)
        + budget_term(&a.preferences, &b.preferences)
        + location_term(&a.preferences, &b.preferences)
        + aligned_term(&a.preferences.move_in, &b.preferences.move_in, MOVE_IN_POINTS)
        + aligned_term(&a.preferences.pets, &b.preferences.pets, PETS_POINTS)
        + aligned_term(&a.preferences.smoking, &b.preferences.smoking, SMOKING_POINTS)
        + aligned_term(&a.preferences.drinking, &b.preferences.drinking, DRINKING_POINTS)
        + aligned_term(
            &a.preferences.cleanliness,
            &b.preferences.cleanliness,
            CLEANLINESS_POINTS,
        )
        + aligned_term(&a.preferences.social, &b.preferences.social, SOCIAL_POINTS);

    total.min(MAX_SCORE) as u8
}

/// Gender term (0 or 20)
///
/// Either side preferring `any` is an automatic award; otherwise both
/// preferences must accept the other's actual gender.
#[inline]
fn gender_term(a: &UserRecord, b: &UserRecord) -> u32 {
    if a.preferences.gender_preference == GenderPreference::Any
        || b.preferences.gender_preference == GenderPreference::Any
    {
        return GENDER_POINTS;
    }

    if a.preferences.gender_preference.accepts(b.profile.gender)
        && b.preferences.gender_preference.accepts(a.profile.gender)
    {
        GENDER_POINTS
    } else {
        0
    }
}

/// Budget term (0-20), proportional to the overlap of the two ranges
///
/// A record with an inverted range (min > max) contributes zero to this term
/// instead of failing the whole computation.
#[inline]
fn budget_term(a: &UserPreferences, b: &UserPreferences) -> u32 {
    let (a_range, b_range) = match (a.budget_range(), b.budget_range()) {
        (Some(ar), Some(br)) => (ar, br),
        _ => return 0,
    };

    let low = a.budget_min.max(b.budget_min);
    let high = a.budget_max.min(b.budget_max);
    let overlap = high.saturating_sub(low);
    if overlap == 0 {
        return 0;
    }

    let avg_range = (a_range + b_range) as f64 / 2.0;
    if avg_range <= 0.0 {
        return 0;
    }

    let score = (BUDGET_POINTS as f64 * overlap as f64 / avg_range).round();
    (score as u32).min(BUDGET_POINTS)
}

/// Location term (0-15): +5 same state, +10 same city, independently additive
#[inline]
fn location_term(a: &UserPreferences, b: &UserPreferences) -> u32 {
    let mut points = 0;
    if a.state.eq_ignore_ascii_case(&b.state) {
        points += STATE_POINTS;
    }
    if a.city.eq_ignore_ascii_case(&b.city) {
        points += CITY_POINTS;
    }
    points
}

/// Full value when both sides agree or either is flexible, else zero
#[inline]
fn aligned_term<T: PartialEq + Flexible>(a: &T, b: &T, points: u32) -> u32 {
    if a == b || a.is_flexible() || b.is_flexible() {
        points
    } else {
        0
    }
}
