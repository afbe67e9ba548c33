use crate::models::{Follow, UserProfile};
use sqlx::PgPool;

/// Follow a user; repeating an existing follow is a no-op returning the
/// current row.
pub async fn create_follow(
    pool: &PgPool,
    follower_id: i64,
    followed_id: i64,
) -> Result<Follow, sqlx::Error> {
    let follow = sqlx::query_as::<_, Follow>(
        r#"
        INSERT INTO follows (follower_id, followed_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, followed_id) DO NOTHING
        RETURNING id, follower_id, followed_id, created_at
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_optional(pool)
    .await?;

    match follow {
        Some(f) => Ok(f),
        None => find_follow(pool, follower_id, followed_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound),
    }
}

pub async fn delete_follow(
    pool: &PgPool,
    follower_id: i64,
    followed_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn find_follow(
    pool: &PgPool,
    follower_id: i64,
    followed_id: i64,
) -> Result<Option<Follow>, sqlx::Error> {
    sqlx::query_as::<_, Follow>(
        r#"
        SELECT id, follower_id, followed_id, created_at
        FROM follows
        WHERE follower_id = $1 AND followed_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_optional(pool)
    .await
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    name: String,
    email_verified: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            id: row.id,
            name: row.name,
            email_verified: row.email_verified,
            created_at: row.created_at,
        }
    }
}

pub async fn list_followers(pool: &PgPool, user_id: i64) -> Result<Vec<UserProfile>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT u.id, u.name, u.email_verified, u.created_at
        FROM follows f
        JOIN users u ON u.id = f.follower_id
        WHERE f.followed_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_following(pool: &PgPool, user_id: i64) -> Result<Vec<UserProfile>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT u.id, u.name, u.email_verified, u.created_at
        FROM follows f
        JOIN users u ON u.id = f.followed_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}
