//! Repository-level tests for score seeding, filtering, and result counters.

use capitalympics_core::scoring::LearningType;
use capitalympics_db::models::score::QuizResult;
use capitalympics_db::models::user::CreateUser;
use capitalympics_db::repositories::{ScoreFilter, ScoreRepo, UserRepo};
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, name: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            language: "en".to_string(),
        },
    )
    .await
    .expect("user insert should succeed");
    user.id
}

async fn seed_countries(pool: &PgPool, count: usize) -> Vec<i64> {
    let continent_id: i64 =
        sqlx::query_scalar("INSERT INTO continents (code, name) VALUES ('AF', 'Africa') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();
    let region_id: i64 = sqlx::query_scalar(
        "INSERT INTO regions (continent_id, name) VALUES ($1, 'Northern Africa') RETURNING id",
    )
    .bind(continent_id)
    .fetch_one(pool)
    .await
    .unwrap();

    let mut ids = Vec::new();
    for i in 0..count {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO countries (region_id, code, name, capital)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(region_id)
        .bind(format!("C{i:02}"))
        .bind(format!("Country {i}"))
        .bind(format!("Capital {i}"))
        .fetch_one(pool)
        .await
        .unwrap();
        ids.push(id);
    }
    ids
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seed_creates_row_per_country_and_type(pool: PgPool) {
    seed_countries(&pool, 4).await;
    let user_id = seed_user(&pool, "seeded").await;

    let created = ScoreRepo::seed_for_user(&pool, user_id).await.unwrap();
    assert_eq!(created, 8, "4 countries x 2 learning types");

    // Seeding again is a no-op.
    let created = ScoreRepo::seed_for_user(&pool, user_id).await.unwrap();
    assert_eq!(created, 0);

    let flags = ScoreRepo::counters_for_user(
        &pool,
        user_id,
        ScoreFilter::for_type(LearningType::Flag),
    )
    .await
    .unwrap();
    assert_eq!(flags.len(), 4);
    assert!(flags.iter().all(|s| s.level == -1 && s.succeeded == 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_apply_result_increments_one_counter(pool: PgPool) {
    let country_ids = seed_countries(&pool, 2).await;
    let user_id = seed_user(&pool, "attempter").await;
    ScoreRepo::seed_for_user(&pool, user_id).await.unwrap();

    let row = ScoreRepo::apply_result(
        &pool,
        user_id,
        country_ids[0],
        LearningType::Capital,
        QuizResult::Medium,
    )
    .await
    .unwrap()
    .expect("score row exists");

    assert_eq!(row.medium, 1);
    assert_eq!(row.succeeded, 0);
    assert_eq!(row.failed, 0);

    // The flag row for the same country is untouched.
    let flag_row = ScoreRepo::find_one(&pool, user_id, country_ids[0], LearningType::Flag)
        .await
        .unwrap()
        .expect("flag row exists");
    assert_eq!(flag_row.medium, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_apply_result_missing_row_is_none(pool: PgPool) {
    let user_id = seed_user(&pool, "nobody").await;
    let result = ScoreRepo::apply_result(&pool, user_id, 12345, LearningType::Flag, QuizResult::Failed)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_country_filter(pool: PgPool) {
    let country_ids = seed_countries(&pool, 3).await;
    let user_id = seed_user(&pool, "narrow").await;
    ScoreRepo::seed_for_user(&pool, user_id).await.unwrap();

    let filter = ScoreFilter {
        learning_type: LearningType::Flag,
        continent_id: None,
        country_id: Some(country_ids[1]),
    };
    let rows = ScoreRepo::counters_for_user(&pool, user_id, filter).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].country_id, country_ids[1]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reset_for_user(pool: PgPool) {
    let country_ids = seed_countries(&pool, 2).await;
    let user_id = seed_user(&pool, "resetter").await;
    ScoreRepo::seed_for_user(&pool, user_id).await.unwrap();

    ScoreRepo::apply_result(&pool, user_id, country_ids[0], LearningType::Flag, QuizResult::Succeeded)
        .await
        .unwrap();

    let reset = ScoreRepo::reset_for_user(&pool, user_id, LearningType::Flag)
        .await
        .unwrap();
    assert_eq!(reset, 2);

    let rows = ScoreRepo::counters_for_user(
        &pool,
        user_id,
        ScoreFilter::for_type(LearningType::Flag),
    )
    .await
    .unwrap();
    assert!(rows.iter().all(|s| s.succeeded == 0 && s.level == -1));
}
