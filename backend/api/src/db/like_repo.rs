use crate::models::Like;
use sqlx::PgPool;

/// Like a post. Duplicate likes hit the unique pair constraint and return
/// the existing row instead of failing.
pub async fn create_like(pool: &PgPool, post_id: i64, user_id: i64) -> Result<Like, sqlx::Error> {
    let like = sqlx::query_as::<_, Like>(
        r#"
        INSERT INTO likes (post_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (post_id, user_id) DO NOTHING
        RETURNING id, post_id, user_id, created_at
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match like {
        Some(l) => Ok(l),
        None => find_by_post_and_user(pool, post_id, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound),
    }
}

pub async fn delete_like(pool: &PgPool, post_id: i64, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM likes WHERE post_id = $1 AND user_id = $2
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn find_by_post_and_user(
    pool: &PgPool,
    post_id: i64,
    user_id: i64,
) -> Result<Option<Like>, sqlx::Error> {
    sqlx::query_as::<_, Like>(
        r#"
        SELECT id, post_id, user_id, created_at
        FROM likes
        WHERE post_id = $1 AND user_id = $2
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn count_by_post(pool: &PgPool, post_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
}
