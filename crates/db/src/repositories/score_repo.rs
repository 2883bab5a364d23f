//! Repository for the `user_scores` table.

use capitalympics_core::scoring::LearningType;
use capitalympics_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::score::{QuizResult, UserScore};

const COLUMNS: &str =
    "id, user_id, country_id, learning_type, succeeded, medium, failed, level, updated_at";

/// Scope of a score query: one learning type, optionally narrowed to a
/// continent or a single country.
#[derive(Debug, Clone, Copy)]
pub struct ScoreFilter {
    pub learning_type: LearningType,
    pub continent_id: Option<DbId>,
    pub country_id: Option<DbId>,
}

impl ScoreFilter {
    pub fn for_type(learning_type: LearningType) -> Self {
        Self {
            learning_type,
            continent_id: None,
            country_id: None,
        }
    }
}

/// Provides access to per-country quiz counters.
pub struct ScoreRepo;

impl ScoreRepo {
    /// Seed one score row per country and learning type for a new user.
    ///
    /// Idempotent: existing rows are left untouched.
    pub async fn seed_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_scores (user_id, country_id, learning_type)
             SELECT $1, c.id, t.lt
             FROM countries AS c
             CROSS JOIN (VALUES ('flag'::learning_type), ('capital'::learning_type)) AS t(lt)
             ON CONFLICT ON CONSTRAINT uq_user_scores_user_country_type DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Fetch a user's counters for one learning type, optionally filtered by
    /// continent or country. Ordered by country id.
    pub async fn counters_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: ScoreFilter,
    ) -> Result<Vec<UserScore>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT s.id, s.user_id, s.country_id, s.learning_type, \
             s.succeeded, s.medium, s.failed, s.level, s.updated_at \
             FROM user_scores AS s",
        );

        if filter.continent_id.is_some() {
            qb.push(
                " JOIN countries AS c ON s.country_id = c.id \
                 JOIN regions AS r ON c.region_id = r.id",
            );
        }

        qb.push(" WHERE s.user_id = ").push_bind(user_id);
        qb.push(" AND s.learning_type = ")
            .push_bind(filter.learning_type);

        if let Some(continent_id) = filter.continent_id {
            qb.push(" AND r.continent_id = ").push_bind(continent_id);
        }
        if let Some(country_id) = filter.country_id {
            qb.push(" AND s.country_id = ").push_bind(country_id);
        }

        qb.push(" ORDER BY s.country_id");

        qb.build_query_as::<UserScore>().fetch_all(pool).await
    }

    /// Find the score row for one user x country x learning type.
    pub async fn find_one(
        pool: &PgPool,
        user_id: DbId,
        country_id: DbId,
        learning_type: LearningType,
    ) -> Result<Option<UserScore>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_scores
             WHERE user_id = $1 AND country_id = $2 AND learning_type = $3"
        );
        sqlx::query_as::<_, UserScore>(&query)
            .bind(user_id)
            .bind(country_id)
            .bind(learning_type)
            .fetch_optional(pool)
            .await
    }

    /// Increment the counter for one quiz outcome, returning the updated row.
    ///
    /// Returns `None` if the score row does not exist. The denormalized
    /// `level` is written separately via [`ScoreRepo::set_level`] once the
    /// caller has derived it from the returned counters.
    pub async fn apply_result(
        pool: &PgPool,
        user_id: DbId,
        country_id: DbId,
        learning_type: LearningType,
        result: QuizResult,
    ) -> Result<Option<UserScore>, sqlx::Error> {
        // `column()` yields a fixed identifier, never client input.
        let column = result.column();
        let query = format!(
            "UPDATE user_scores
             SET {column} = {column} + 1, updated_at = now()
             WHERE user_id = $1 AND country_id = $2 AND learning_type = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserScore>(&query)
            .bind(user_id)
            .bind(country_id)
            .bind(learning_type)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the denormalized score level for one row.
    pub async fn set_level(pool: &PgPool, id: DbId, level: i32) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE user_scores SET level = $2 WHERE id = $1")
            .bind(id)
            .bind(level)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset all counters of one learning type back to the no-attempts state.
    pub async fn reset_for_user(
        pool: &PgPool,
        user_id: DbId,
        learning_type: LearningType,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_scores
             SET succeeded = 0, medium = 0, failed = 0, level = -1, updated_at = now()
             WHERE user_id = $1 AND learning_type = $2",
        )
        .bind(user_id)
        .bind(learning_type)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
