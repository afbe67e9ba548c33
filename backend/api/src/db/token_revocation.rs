//! Revocation list: persisted set of revoked token ids. Written at logout,
//! consulted on every authenticated request, garbage-collected once past
//! expiry.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Insert a revoked jti. Idempotent: a duplicate logout is a no-op, never
/// an error.
pub async fn revoke(pool: &PgPool, jti: &str, expires_at: DateTime<Utc>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO revoked_tokens (jti, expires_at)
        VALUES ($1, $2)
        ON CONFLICT (jti) DO NOTHING
        "#,
    )
    .bind(jti)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Membership check by unique key.
pub async fn is_revoked(pool: &PgPool, jti: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = $1)
        "#,
    )
    .bind(jti)
    .fetch_one(pool)
    .await
}

/// Delete entries strictly past `now`. Safe to run repeatedly and
/// concurrently with inserts and lookups; an unexpired entry is never
/// removed.
pub async fn cleanup_expired(pool: &PgPool, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM revoked_tokens
        WHERE expires_at < $1
        "#,
    )
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
