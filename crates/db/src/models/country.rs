//! Geography reference models: continents, regions, countries.

use capitalympics_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `continents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Continent {
    pub id: DbId,
    pub code: String,
    pub name: String,
}

/// A row from the `regions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Region {
    pub id: DbId,
    pub continent_id: DbId,
    pub name: String,
}

/// A row from the `countries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Country {
    pub id: DbId,
    pub region_id: DbId,
    /// ISO 3166-1 alpha-3 code.
    pub code: String,
    pub name: String,
    pub capital: String,
    pub flag_url: String,
}
