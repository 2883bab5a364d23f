//! Handlers for the `/auth` resource (login, refresh, logout, account).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use capitalympics_core::error::CoreError;
use capitalympics_core::types::DbId;
use capitalympics_db::models::session::CreateSession;
use capitalympics_db::models::user::{UpdateUser, UserResponse};
use capitalympics_db::repositories::{SessionRepo, UserRepo};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with name + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Find user by name. A missing user and a wrong password produce the
    //    same message so the endpoint cannot be used to probe names.
    let user = UserRepo::find_by_name(&state.pool, &input.name)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid name or password".into()))
        })?;

    // 2. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid name or password".into(),
        )));
    }

    // 3. Record activity and issue tokens.
    UserRepo::touch_last_activity(&state.pool, user.id).await?;

    let response = create_auth_response(&state, user.id).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Hash the provided refresh token.
    let token_hash = hash_refresh_token(&input.refresh_token);

    // 2. Find matching active session.
    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // 3. Revoke old session (token rotation).
    SessionRepo::revoke(&state.pool, session.id).await?;

    // 4. Generate new tokens and create a new session.
    let response = create_auth_response(&state, session.user_id).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// Return the authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PATCH /api/v1/auth/me
///
/// Update the authenticated user's name and/or language preference.
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }

    let user = UserRepo::update(&state.pool, auth_user.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth_user.user_id,
        }))?;

    Ok(Json(DataResponse { data: user.into() }))
}

/// DELETE /api/v1/auth/me
///
/// Delete the authenticated user's account. Score rows and sessions are
/// removed with it. Returns 204 No Content.
pub async fn delete_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<StatusCode> {
    let deleted = UserRepo::delete(&state.pool, auth_user.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth_user.user_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Accepted user name: 3 to 20 characters.
pub fn validate_name(name: &str) -> Result<(), AppError> {
    let len = name.chars().count();
    if !(3..=20).contains(&len) {
        return Err(AppError::Core(CoreError::Validation(
            "Name must be between 3 and 20 characters".into(),
        )));
    }
    Ok(())
}

async fn find_user(
    state: &AppState,
    user_id: DbId,
) -> AppResult<capitalympics_db::models::user::User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user_id,
        }))
}

/// Generate access + refresh tokens, persist a session row, and build the response.
pub(crate) async fn create_auth_response(
    state: &AppState,
    user_id: DbId,
) -> AppResult<AuthResponse> {
    let user = find_user(state, user_id).await?;

    let access_token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let session_input = CreateSession {
        user_id: user.id,
        refresh_token_hash: refresh_hash,
        expires_at,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: user.into(),
    })
}
