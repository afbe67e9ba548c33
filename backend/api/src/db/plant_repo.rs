use crate::models::Plant;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

pub async fn create_plant(
    pool: &PgPool,
    user_id: i64,
    name: &str,
    variety: Option<&str>,
    planted_on: Option<NaiveDate>,
) -> Result<Plant, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Plant>(
        r#"
        INSERT INTO plants (user_id, name, variety, planted_on, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, user_id, name, variety, planted_on, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(variety)
    .bind(planted_on)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Plant>, sqlx::Error> {
    sqlx::query_as::<_, Plant>(
        r#"
        SELECT id, user_id, name, variety, planted_on, created_at, updated_at
        FROM plants
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Plant>, sqlx::Error> {
    sqlx::query_as::<_, Plant>(
        r#"
        SELECT id, user_id, name, variety, planted_on, created_at, updated_at
        FROM plants
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_plant(
    pool: &PgPool,
    id: i64,
    name: Option<&str>,
    variety: Option<&str>,
    planted_on: Option<NaiveDate>,
) -> Result<Plant, sqlx::Error> {
    sqlx::query_as::<_, Plant>(
        r#"
        UPDATE plants
        SET name = COALESCE($1, name),
            variety = COALESCE($2, variety),
            planted_on = COALESCE($3, planted_on),
            updated_at = $4
        WHERE id = $5
        RETURNING id, user_id, name, variety, planted_on, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(variety)
    .bind(planted_on)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn delete_plant(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM plants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
