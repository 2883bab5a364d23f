//! Route definitions for the `/countries` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::countries;
use crate::state::AppState;

/// Routes mounted at `/countries`.
///
/// ```text
/// GET /             -> list (optional ?continent_id=)
/// GET /continents   -> list continents
/// GET /{id}         -> get one country
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(countries::list))
        .route("/continents", get(countries::list_continents))
        .route("/{id}", get(countries::get))
}
