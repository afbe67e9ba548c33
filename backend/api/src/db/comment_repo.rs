use crate::models::Comment;
use chrono::Utc;
use sqlx::PgPool;

pub async fn create_comment(
    pool: &PgPool,
    post_id: i64,
    user_id: i64,
    body: &str,
) -> Result<Comment, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, user_id, body, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id, post_id, user_id, body, created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(body)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, user_id, body, created_at, updated_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_by_post(pool: &PgPool, post_id: i64) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, user_id, body, created_at, updated_at
        FROM comments
        WHERE post_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

pub async fn delete_comment(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
