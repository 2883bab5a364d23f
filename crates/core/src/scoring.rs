//! Mastery scoring and next-country selection.
//!
//! A user's history for one country under one learning type is a triple of
//! attempt counters (succeeded / medium / failed). [`calculate_score`] folds
//! the counters into a 0-100 mastery score, and [`select_next_country`]
//! picks the next country to quiz, biased toward the weaker half of the
//! user's scores.

use rand::Rng;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Learning type
// ---------------------------------------------------------------------------

/// Quiz category: flag recognition or capital recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "learning_type", rename_all = "lowercase")]
pub enum LearningType {
    Flag,
    Capital,
}

impl LearningType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Capital => "capital",
        }
    }
}

// ---------------------------------------------------------------------------
// Score calculation
// ---------------------------------------------------------------------------

/// Sentinel score for a country the user has never been quizzed on.
pub const NO_ATTEMPTS_SCORE: i32 = -1;

/// Probability of drawing from the weaker half of the sorted scores.
pub const WEAK_HALF_WEIGHT: f64 = 0.8;

/// Attempt counters for one user x one country x one learning type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryCounters {
    pub country_id: DbId,
    pub succeeded: i64,
    pub medium: i64,
    pub failed: i64,
}

impl CountryCounters {
    /// Derive the mastery score for these counters.
    pub fn score(&self) -> i32 {
        calculate_score(self.succeeded, self.medium, self.failed)
    }
}

/// A country paired with its derived mastery score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ScoredCountry {
    pub country_id: DbId,
    pub score: i32,
}

/// Fold attempt counters into a mastery score in `[0, 100]`, or
/// [`NO_ATTEMPTS_SCORE`] when no attempts have been recorded.
///
/// Outcome percentages are weighted asymmetrically (successes rewarded most,
/// failures penalized more than mediums) and the result is damped by
/// `log10(succeeded + 1)` so a handful of lucky early answers cannot produce
/// a near-perfect score. Callers must pass non-negative counters.
pub fn calculate_score(succeeded: i64, medium: i64, failed: i64) -> i32 {
    let total = succeeded + medium + failed;
    if total == 0 {
        return NO_ATTEMPTS_SCORE;
    }

    let total = total as f64;
    let succeeded_pct = succeeded as f64 / total;
    let medium_pct = medium as f64 / total;
    let failed_pct = failed as f64 / total;

    let weighted_succeeded = (succeeded_pct * 6.0).min(1.1);
    let weighted_medium = (medium_pct * 2.0).min(1.0);
    let weighted_failed = failed_pct * 4.0;

    let raw = (weighted_succeeded * 100.0 - weighted_medium * 10.0 - weighted_failed * 25.0)
        * ((succeeded + 1) as f64).log10()
        / 1.625;

    (raw.round() as i32).clamp(0, 100)
}

/// Average derived score over a set of counters, or `None` for an empty set.
///
/// Entries with no attempts contribute their `-1` sentinel to the mean,
/// matching how the per-learning-type overview has always been computed.
pub fn average_score(counters: &[CountryCounters]) -> Option<f64> {
    if counters.is_empty() {
        return None;
    }
    let sum: i64 = counters.iter().map(|c| c.score() as i64).sum();
    Some(sum as f64 / counters.len() as f64)
}

// ---------------------------------------------------------------------------
// Next-country selection
// ---------------------------------------------------------------------------

/// Pick the next country to quiz from the user's per-country counters.
///
/// Entries are scored, sorted ascending by `(score, country_id)`, and split
/// into a weak half (the first `ceil(n/2)` entries) and a strong half (the
/// rest). With probability [`WEAK_HALF_WEIGHT`] a uniformly random entry is
/// drawn from the weak half, otherwise from the strong half. A single-entry
/// input always yields that entry.
///
/// Returns [`CoreError::Validation`] for an empty input.
pub fn select_next_country<R: Rng + ?Sized>(
    counters: &[CountryCounters],
    rng: &mut R,
) -> Result<DbId, CoreError> {
    if counters.is_empty() {
        return Err(CoreError::Validation(
            "cannot select a country from an empty score set".into(),
        ));
    }

    let mut scored: Vec<ScoredCountry> = counters
        .iter()
        .map(|c| ScoredCountry {
            country_id: c.country_id,
            score: c.score(),
        })
        .collect();
    // Country id as secondary key keeps the ordering deterministic; the only
    // randomness is the draw below.
    scored.sort_by_key(|s| (s.score, s.country_id));

    let half = scored.len().div_ceil(2);
    let (weak, strong) = scored.split_at(half);

    let pool = if strong.is_empty() || rng.random::<f64>() < WEAK_HALF_WEIGHT {
        weak
    } else {
        strong
    };

    Ok(pool[rng.random_range(0..pool.len())].country_id)
}
