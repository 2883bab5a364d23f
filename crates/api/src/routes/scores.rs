//! Route definitions for the `/scores` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scores;
use crate::state::AppState;

/// Routes mounted at `/scores` (all require auth).
///
/// ```text
/// GET  /              -> counters + derived scores
/// GET  /overall       -> per-learning-type averages
/// GET  /next          -> next country to quiz
/// POST /{country_id}  -> record a quiz outcome
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scores::list))
        .route("/overall", get(scores::overall))
        .route("/next", get(scores::next_country))
        .route("/{country_id}", post(scores::record_result))
}
