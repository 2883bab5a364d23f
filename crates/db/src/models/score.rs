//! Quiz score models and DTOs.

use capitalympics_core::scoring::{CountryCounters, LearningType};
use capitalympics_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_scores` table: attempt counters for one
/// user x country x learning type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserScore {
    pub id: DbId,
    pub user_id: DbId,
    pub country_id: DbId,
    pub learning_type: LearningType,
    pub succeeded: i64,
    pub medium: i64,
    pub failed: i64,
    /// Denormalized copy of the derived score, -1 until the first attempt.
    pub level: i32,
    pub updated_at: Timestamp,
}

impl UserScore {
    /// View of this row as core counters for scoring and selection.
    pub fn counters(&self) -> CountryCounters {
        CountryCounters {
            country_id: self.country_id,
            succeeded: self.succeeded,
            medium: self.medium,
            failed: self.failed,
        }
    }
}

/// Outcome of a single quiz attempt, reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizResult {
    Succeeded,
    Medium,
    Failed,
}

impl QuizResult {
    /// Counter column incremented by this outcome.
    pub fn column(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Medium => "medium",
            Self::Failed => "failed",
        }
    }
}
