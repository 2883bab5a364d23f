//! Shared harness for HTTP-level integration tests.
//!
//! Builds the application router exactly as production does (same middleware
//! stack via `build_app_router`) and provides small request helpers around
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use capitalympics_api::auth::jwt::JwtConfig;
use capitalympics_api::config::ServerConfig;
use capitalympics_api::router::build_app_router;
use capitalympics_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        password_min_length: 8,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router over the given pool, mirroring
/// production wiring so tests exercise the same middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Seed a small geography fixture: one continent (Europe, id returned),
/// one region, and three countries. Returns the country ids.
pub async fn seed_geography(pool: &PgPool) -> Vec<i64> {
    let continent_id: i64 =
        sqlx::query_scalar("INSERT INTO continents (code, name) VALUES ('EU', 'Europe') RETURNING id")
            .fetch_one(pool)
            .await
            .expect("continent insert should succeed");

    let region_id: i64 = sqlx::query_scalar(
        "INSERT INTO regions (continent_id, name) VALUES ($1, 'Western Europe') RETURNING id",
    )
    .bind(continent_id)
    .fetch_one(pool)
    .await
    .expect("region insert should succeed");

    let mut country_ids = Vec::new();
    for (code, name, capital) in [
        ("FRA", "France", "Paris"),
        ("DEU", "Germany", "Berlin"),
        ("ESP", "Spain", "Madrid"),
    ] {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO countries (region_id, code, name, capital)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(region_id)
        .bind(code)
        .bind(name)
        .bind(capital)
        .fetch_one(pool)
        .await
        .expect("country insert should succeed");
        country_ids.push(id);
    }
    country_ids
}

/// Sign up a user through the API and log in, returning
/// `(access_token, user_id)`.
pub async fn signup_and_login(app: &Router, name: &str) -> (String, i64) {
    let password = "test_password_123!";
    let response = post_json(
        app,
        "/api/v1/users",
        serde_json::json!({ "name": name, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "name": name, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let token = json["access_token"].as_str().expect("access_token").to_string();
    let user_id = json["user"]["id"].as_i64().expect("user id");
    (token, user_id)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: &Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn patch_json_auth(
    app: &Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("PATCH")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
