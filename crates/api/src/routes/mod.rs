pub mod auth;
pub mod countries;
pub mod health;
pub mod scores;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                    login (public)
/// /auth/refresh                  refresh (public)
/// /auth/logout                   logout (requires auth)
/// /auth/me                       get / update / delete own account
///
/// /users                         sign-up (public)
/// /users/count                   registered-user count (public)
///
/// /countries                     list (optional continent filter)
/// /countries/continents          list continents
/// /countries/{id}                get one country
///
/// /scores                        counters + derived scores (requires auth)
/// /scores/overall                per-learning-type averages
/// /scores/next                   next country to quiz
/// /scores/{country_id}           record a quiz outcome (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/countries", countries::router())
        .nest("/scores", scores::router())
}
