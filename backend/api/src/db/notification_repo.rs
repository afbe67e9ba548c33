use crate::models::Notification;
use sqlx::PgPool;

/// Record a notification for `user_id`. Self-notifications (actor liking
/// their own post, etc.) are skipped by the callers, not here.
pub async fn create_notification(
    pool: &PgPool,
    user_id: i64,
    actor_id: i64,
    kind: &str,
    post_id: Option<i64>,
) -> Result<Notification, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (user_id, actor_id, kind, post_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, actor_id, kind, post_id, read, created_at
        "#,
    )
    .bind(user_id)
    .bind(actor_id)
    .bind(kind)
    .bind(post_id)
    .fetch_one(pool)
    .await
}

pub async fn list_by_user(
    pool: &PgPool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, user_id, actor_id, kind, post_id, read, created_at
        FROM notifications
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_by_user(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM notifications WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn count_unread(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = FALSE
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Mark one notification read; scoped to the owner so a user cannot touch
/// another user's rows.
pub async fn mark_read(pool: &PgPool, id: i64, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn mark_all_read(pool: &PgPool, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
