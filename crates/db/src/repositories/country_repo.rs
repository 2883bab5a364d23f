//! Repository for the geography reference tables.

use capitalympics_core::types::DbId;
use sqlx::PgPool;

use crate::models::country::{Continent, Country};

const COLUMNS: &str = "id, region_id, code, name, capital, flag_url";

/// Read-only access to countries and continents.
pub struct CountryRepo;

impl CountryRepo {
    /// List all countries ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Country>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM countries ORDER BY name");
        sqlx::query_as::<_, Country>(&query).fetch_all(pool).await
    }

    /// List countries belonging to one continent, ordered by name.
    pub async fn list_by_continent(
        pool: &PgPool,
        continent_id: DbId,
    ) -> Result<Vec<Country>, sqlx::Error> {
        let query = "SELECT c.id, c.region_id, c.code, c.name, c.capital, c.flag_url
             FROM countries AS c
             JOIN regions AS r ON c.region_id = r.id
             WHERE r.continent_id = $1
             ORDER BY c.name";
        sqlx::query_as::<_, Country>(query)
            .bind(continent_id)
            .fetch_all(pool)
            .await
    }

    /// Find a country by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Country>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM countries WHERE id = $1");
        sqlx::query_as::<_, Country>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all continents ordered by name.
    pub async fn list_continents(pool: &PgPool) -> Result<Vec<Continent>, sqlx::Error> {
        sqlx::query_as::<_, Continent>("SELECT id, code, name FROM continents ORDER BY name")
            .fetch_all(pool)
            .await
    }
}
