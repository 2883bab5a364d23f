//! Handlers for the `/scores` resource: per-country counters with derived
//! mastery scores, overall averages, quiz-result recording, and next-country
//! selection.

use axum::extract::{Path, Query, State};
use axum::Json;
use capitalympics_core::error::CoreError;
use capitalympics_core::scoring::{
    average_score, calculate_score, select_next_country, CountryCounters, LearningType,
};
use capitalympics_core::types::DbId;
use capitalympics_db::models::country::Country;
use capitalympics_db::models::score::{QuizResult, UserScore};
use capitalympics_db::repositories::{CountryRepo, ScoreFilter, ScoreRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /scores` and `GET /scores/next`.
#[derive(Debug, Deserialize)]
pub struct ScoreParams {
    pub learning_type: LearningType,
    pub continent_id: Option<DbId>,
    pub country_id: Option<DbId>,
}

/// One per-country score entry with the score derived on demand.
#[derive(Debug, Serialize)]
pub struct ScoreEntry {
    pub country_id: DbId,
    pub learning_type: LearningType,
    pub succeeded: i64,
    pub medium: i64,
    pub failed: i64,
    /// Derived mastery score in `[0, 100]`, or -1 before the first attempt.
    pub score: i32,
}

impl From<UserScore> for ScoreEntry {
    fn from(row: UserScore) -> Self {
        let score = calculate_score(row.succeeded, row.medium, row.failed);
        Self {
            country_id: row.country_id,
            learning_type: row.learning_type,
            succeeded: row.succeeded,
            medium: row.medium,
            failed: row.failed,
            score,
        }
    }
}

/// Response body for `GET /scores/overall`.
#[derive(Debug, Serialize)]
pub struct OverallScores {
    pub flag: Option<f64>,
    pub capital: Option<f64>,
}

/// Request body for `POST /scores/{country_id}`.
#[derive(Debug, Deserialize)]
pub struct RecordResultRequest {
    pub learning_type: LearningType,
    pub result: QuizResult,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/scores
///
/// The authenticated user's counters for one learning type, optionally
/// filtered by continent or country, each with its derived score.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ScoreParams>,
) -> AppResult<Json<DataResponse<Vec<ScoreEntry>>>> {
    let filter = ScoreFilter {
        learning_type: params.learning_type,
        continent_id: params.continent_id,
        country_id: params.country_id,
    };
    let rows = ScoreRepo::counters_for_user(&state.pool, auth_user.user_id, filter).await?;
    let entries = rows.into_iter().map(ScoreEntry::from).collect();
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/scores/overall
///
/// Average derived score per learning type across all countries. `null` for
/// a learning type with no score rows at all.
pub async fn overall(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<OverallScores>>> {
    let flag = learning_type_average(&state, auth_user.user_id, LearningType::Flag).await?;
    let capital = learning_type_average(&state, auth_user.user_id, LearningType::Capital).await?;

    Ok(Json(DataResponse {
        data: OverallScores { flag, capital },
    }))
}

/// POST /api/v1/scores/{country_id}
///
/// Record one quiz outcome for a country: increment the matching counter,
/// refresh the denormalized per-country level and the user's overall level,
/// and return the updated entry.
pub async fn record_result(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(country_id): Path<DbId>,
    Json(input): Json<RecordResultRequest>,
) -> AppResult<Json<DataResponse<ScoreEntry>>> {
    let row = ScoreRepo::apply_result(
        &state.pool,
        auth_user.user_id,
        country_id,
        input.learning_type,
        input.result,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "score",
        id: country_id,
    }))?;

    // Refresh the denormalized copies from the post-increment counters.
    let level = calculate_score(row.succeeded, row.medium, row.failed);
    ScoreRepo::set_level(&state.pool, row.id, level).await?;
    refresh_user_level(&state, auth_user.user_id).await?;
    UserRepo::touch_last_activity(&state.pool, auth_user.user_id).await?;

    tracing::debug!(
        user_id = auth_user.user_id,
        country_id,
        learning_type = input.learning_type.as_str(),
        level,
        "Recorded quiz result"
    );

    Ok(Json(DataResponse {
        data: ScoreEntry::from(row),
    }))
}

/// GET /api/v1/scores/next
///
/// Select the next country to quiz for one learning type (optionally within
/// a continent), biased toward the user's weaker countries. Returns 400 if
/// the user has no score rows in the requested scope.
pub async fn next_country(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ScoreParams>,
) -> AppResult<Json<DataResponse<Country>>> {
    let filter = ScoreFilter {
        learning_type: params.learning_type,
        continent_id: params.continent_id,
        country_id: None,
    };
    let rows = ScoreRepo::counters_for_user(&state.pool, auth_user.user_id, filter).await?;
    let counters: Vec<CountryCounters> = rows.iter().map(UserScore::counters).collect();

    let country_id = select_next_country(&counters, &mut rand::rng())?;

    let country = CountryRepo::find_by_id(&state.pool, country_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "country",
            id: country_id,
        }))?;

    Ok(Json(DataResponse { data: country }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn learning_type_average(
    state: &AppState,
    user_id: DbId,
    learning_type: LearningType,
) -> AppResult<Option<f64>> {
    let rows =
        ScoreRepo::counters_for_user(&state.pool, user_id, ScoreFilter::for_type(learning_type))
            .await?;
    let counters: Vec<CountryCounters> = rows.iter().map(UserScore::counters).collect();
    Ok(average_score(&counters))
}

/// Recompute the user's denormalized overall level as the rounded mean of the
/// flag and capital averages, clamped to `[-1, 100]`.
async fn refresh_user_level(state: &AppState, user_id: DbId) -> AppResult<()> {
    let flag = learning_type_average(state, user_id, LearningType::Flag).await?;
    let capital = learning_type_average(state, user_id, LearningType::Capital).await?;

    let averages: Vec<f64> = [flag, capital].into_iter().flatten().collect();
    let level = if averages.is_empty() {
        -1
    } else {
        let mean = averages.iter().sum::<f64>() / averages.len() as f64;
        (mean.round() as i32).clamp(-1, 100)
    };

    UserRepo::update_level(&state.pool, user_id, level).await?;
    Ok(())
}
