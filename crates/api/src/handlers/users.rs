//! Handlers for the `/users` resource (sign-up, public stats).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use capitalympics_core::error::CoreError;
use capitalympics_db::models::user::{CreateUser, UserResponse};
use capitalympics_db::repositories::{ScoreRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::validate_name;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users` (sign-up).
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub password: String,
    /// Preferred UI language (ISO 639-1 code); defaults to English.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// Response body for `GET /users/count`.
#[derive(Debug, Serialize)]
pub struct UserCount {
    pub count: i64,
}

/// POST /api/v1/users
///
/// Register a new user: hash the password, insert the row, and seed a score
/// row per country and learning type so selection has a full score set from
/// the first quiz. A duplicate name maps to 409 via the unique constraint.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_name(&input.name)?;
    validate_password_strength(&input.password, state.config.password_min_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        name: input.name,
        password_hash,
        language: input.language,
    };
    let user = UserRepo::create(&state.pool, &create).await?;

    let seeded = ScoreRepo::seed_for_user(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, seeded, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: user.into() }),
    ))
}

/// GET /api/v1/users/count
///
/// Public count of registered users.
pub async fn count(State(state): State<AppState>) -> AppResult<Json<DataResponse<UserCount>>> {
    let count = UserRepo::count(&state.pool).await?;
    Ok(Json(DataResponse {
        data: UserCount { count },
    }))
}
