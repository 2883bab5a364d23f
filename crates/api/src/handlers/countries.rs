//! Handlers for the `/countries` resource (read-only reference data).

use axum::extract::{Path, Query, State};
use axum::Json;
use capitalympics_core::error::CoreError;
use capitalympics_core::types::DbId;
use capitalympics_db::models::country::{Continent, Country};
use capitalympics_db::repositories::CountryRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /countries`.
#[derive(Debug, Deserialize)]
pub struct ListCountriesParams {
    pub continent_id: Option<DbId>,
}

/// GET /api/v1/countries
///
/// List countries, optionally narrowed to one continent.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListCountriesParams>,
) -> AppResult<Json<DataResponse<Vec<Country>>>> {
    let countries = match params.continent_id {
        Some(continent_id) => CountryRepo::list_by_continent(&state.pool, continent_id).await?,
        None => CountryRepo::list(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: countries }))
}

/// GET /api/v1/countries/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Country>>> {
    let country = CountryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "country",
            id,
        }))?;
    Ok(Json(DataResponse { data: country }))
}

/// GET /api/v1/countries/continents
pub async fn list_continents(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Continent>>>> {
    let continents = CountryRepo::list_continents(&state.pool).await?;
    Ok(Json(DataResponse { data: continents }))
}
