//! HTTP-level integration tests for sign-up, login, token refresh, logout,
//! and account management.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, patch_json_auth, post_json, post_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Sign-up
// ---------------------------------------------------------------------------

/// Successful sign-up returns 201 with the public user representation and
/// seeds one score row per country and learning type.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_sign_up_creates_user_and_seeds_scores(pool: PgPool) {
    let country_ids = common::seed_geography(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        &app,
        "/api/v1/users",
        serde_json::json!({ "name": "explorer", "password": "long_enough_pw" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "explorer");
    assert_eq!(json["data"]["language"], "en");
    assert_eq!(json["data"]["level"], -1);
    assert!(
        json["data"]["password_hash"].is_null(),
        "password hash must never be serialized"
    );

    // 3 countries x 2 learning types.
    let seeded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_scores")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(seeded, (country_ids.len() * 2) as i64);
}

/// A duplicate name is rejected with 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_sign_up_duplicate_name_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "name": "duplicate", "password": "long_enough_pw" });
    let response = post_json(&app, "/api/v1/users", body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(&app, "/api/v1/users", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

/// Names outside 3..=20 characters and short passwords are rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_sign_up_validation(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/users",
        serde_json::json!({ "name": "ab", "password": "long_enough_pw" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/v1/users",
        serde_json::json!({ "name": "valid_name", "password": "short" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// GET /users/count is public and reflects registrations.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_count(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(&app, "/api/v1/users/count").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["count"], 0);

    common::signup_and_login(&app, "counted").await;

    let response = get(&app, "/api/v1/users/count").await;
    assert_eq!(body_json(response).await["data"]["count"], 1);
}

// ---------------------------------------------------------------------------
// Login / refresh / logout
// ---------------------------------------------------------------------------

/// Successful login returns tokens and the public user info.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::signup_and_login(&app, "loginuser").await;

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "name": "loginuser", "password": "test_password_123!" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["name"], "loginuser");
    assert!(
        json["user"]["last_activity"].is_string(),
        "login must record activity"
    );
}

/// Wrong password and unknown name both return 401 with the same message.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_rejections_are_uniform(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::signup_and_login(&app, "wrongpw").await;

    let wrong_pw = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "name": "wrongpw", "password": "incorrect" }),
    )
    .await;
    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);
    let wrong_pw = body_json(wrong_pw).await;

    let unknown = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "name": "nobody_here", "password": "incorrect" }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown = body_json(unknown).await;

    assert_eq!(wrong_pw["error"], unknown["error"]);
}

/// Refresh rotates the session: the new token works, the old one is dead.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::signup_and_login(&app, "refresher").await;

    let login = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "name": "refresher", "password": "test_password_123!" }),
    )
    .await;
    let login = body_json(login).await;
    let old_refresh = login["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        &app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": old_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    assert!(refreshed["access_token"].is_string());
    assert_ne!(refreshed["refresh_token"], old_refresh);

    // The rotated-out token must no longer be accepted.
    let response = post_json(
        &app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": old_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes all sessions; subsequent refresh fails.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::signup_and_login(&app, "leaver").await;

    let login = post_json(
        &app,
        "/api/v1/auth/login",
        serde_json::json!({ "name": "leaver", "password": "test_password_123!" }),
    )
    .await;
    let refresh_token = body_json(login).await["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_json_auth(&app, "/api/v1/auth/logout", &token, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        &app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Account management
// ---------------------------------------------------------------------------

/// GET /auth/me requires a token and returns the profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user_id) = common::signup_and_login(&app, "profiled").await;

    let response = get(&app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(&app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user_id);
    assert_eq!(json["data"]["name"], "profiled");
}

/// PATCH /auth/me updates name and language.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_me(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::signup_and_login(&app, "renamer").await;

    let response = patch_json_auth(
        &app,
        "/api/v1/auth/me",
        &token,
        serde_json::json!({ "name": "renamed", "language": "fr" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "renamed");
    assert_eq!(json["data"]["language"], "fr");

    // A too-short name is rejected.
    let response = patch_json_auth(
        &app,
        "/api/v1/auth/me",
        &token,
        serde_json::json!({ "name": "xy" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// DELETE /auth/me removes the account and its score rows.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_me_cascades(pool: PgPool) {
    common::seed_geography(&pool).await;
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = common::signup_and_login(&app, "doomed").await;

    let response = delete_auth(&app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_scores WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0, "score rows must be deleted with the account");
}
