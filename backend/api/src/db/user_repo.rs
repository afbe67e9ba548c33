//! User repository. Emails are lowercased at this boundary so the unique
//! index always sees one spelling.

use crate::models::User;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const USER_COLUMNS: &str = r#"
    id, email, name, password_hash, provider, provider_uid,
    email_verified, email_verification_token, email_verification_sent_at,
    password_reset_token, password_reset_sent_at, created_at, updated_at
"#;

/// Create a password-based user with a pending verification token.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    password_hash: &str,
    verification_token: &str,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users
            (email, name, password_hash, email_verified,
             email_verification_token, email_verification_sent_at,
             created_at, updated_at)
        VALUES ($1, $2, $3, FALSE, $4, $5, $5, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(email.to_lowercase())
    .bind(name)
    .bind(password_hash)
    .bind(verification_token)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Find or create a user for a verified external identity. Provider-created
/// accounts have no password and are email-verified from the start.
pub async fn find_or_create_oauth_user(
    pool: &PgPool,
    provider: &str,
    provider_uid: &str,
    email: &str,
    name: &str,
) -> Result<User, sqlx::Error> {
    if let Some(user) = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users
        WHERE provider = $1 AND provider_uid = $2
        "#
    ))
    .bind(provider)
    .bind(provider_uid)
    .fetch_optional(pool)
    .await?
    {
        return Ok(user);
    }

    let now = Utc::now();
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users
            (email, name, provider, provider_uid, email_verified,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, TRUE, $5, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(email.to_lowercase())
    .bind(name)
    .bind(provider)
    .bind(provider_uid)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users WHERE email = $1
        "#
    ))
    .bind(email.to_lowercase())
    .fetch_optional(pool)
    .await
}

pub async fn find_by_verification_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users WHERE email_verification_token = $1
        "#
    ))
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_reset_token(pool: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users WHERE password_reset_token = $1
        "#
    ))
    .bind(token)
    .fetch_optional(pool)
    .await
}

/// Mark the email verified and clear the one-time token.
pub async fn mark_email_verified(pool: &PgPool, user_id: i64) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET email_verified = TRUE,
            email_verification_token = NULL,
            email_verification_sent_at = NULL,
            updated_at = $1
        WHERE id = $2
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn set_verification_token(
    pool: &PgPool,
    user_id: i64,
    token: &str,
    sent_at: DateTime<Utc>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET email_verification_token = $1,
            email_verification_sent_at = $2,
            updated_at = $2
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(token)
    .bind(sent_at)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn set_reset_token(
    pool: &PgPool,
    user_id: i64,
    token: &str,
    sent_at: DateTime<Utc>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET password_reset_token = $1,
            password_reset_sent_at = $2,
            updated_at = $2
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(token)
    .bind(sent_at)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Replace the password and consume the reset token.
pub async fn update_password(
    pool: &PgPool,
    user_id: i64,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET password_hash = $1,
            password_reset_token = NULL,
            password_reset_sent_at = NULL,
            updated_at = $2
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(password_hash)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn update_name(pool: &PgPool, user_id: i64, name: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET name = $1, updated_at = $2
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(pool)
    .await
}
