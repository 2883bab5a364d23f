//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST /        -> sign-up
/// GET  /count   -> registered-user count
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(users::sign_up))
        .route("/count", get(users::count))
}
