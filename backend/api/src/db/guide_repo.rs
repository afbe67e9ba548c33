use crate::models::Guide;
use chrono::Utc;
use sqlx::PgPool;

pub async fn create_guide(
    pool: &PgPool,
    user_id: i64,
    title: &str,
    plant_name: &str,
    body: &str,
) -> Result<Guide, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Guide>(
        r#"
        INSERT INTO guides (user_id, title, plant_name, body, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, user_id, title, plant_name, body, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(plant_name)
    .bind(body)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Guide>, sqlx::Error> {
    sqlx::query_as::<_, Guide>(
        r#"
        SELECT id, user_id, title, plant_name, body, created_at, updated_at
        FROM guides
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List guides, optionally filtered by plant name.
pub async fn list_guides(
    pool: &PgPool,
    plant_name: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Guide>, sqlx::Error> {
    sqlx::query_as::<_, Guide>(
        r#"
        SELECT id, user_id, title, plant_name, body, created_at, updated_at
        FROM guides
        WHERE ($1::VARCHAR IS NULL OR plant_name = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(plant_name)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_guides(pool: &PgPool, plant_name: Option<&str>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM guides WHERE ($1::VARCHAR IS NULL OR plant_name = $1)
        "#,
    )
    .bind(plant_name)
    .fetch_one(pool)
    .await
}

pub async fn update_guide(
    pool: &PgPool,
    id: i64,
    title: Option<&str>,
    plant_name: Option<&str>,
    body: Option<&str>,
) -> Result<Guide, sqlx::Error> {
    sqlx::query_as::<_, Guide>(
        r#"
        UPDATE guides
        SET title = COALESCE($1, title),
            plant_name = COALESCE($2, plant_name),
            body = COALESCE($3, body),
            updated_at = $4
        WHERE id = $5
        RETURNING id, user_id, title, plant_name, body, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(plant_name)
    .bind(body)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn delete_guide(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM guides WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
