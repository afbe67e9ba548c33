//! Email-verification and password-reset token flows. Tokens are random
//! hex, single-use, and age out (24h for verification, 2h for reset).

use chrono::Utc;
use sqlx::PgPool;

use crate::db::user_repo;
use crate::error::AppError;
use crate::models::User;
use crate::security;
use crate::services::mailer::Mailer;

/// Issue (or reissue) a verification token and mail the link.
pub async fn send_verification(
    pool: &PgPool,
    mailer: &Mailer,
    user: &User,
) -> Result<(), AppError> {
    let token = security::generate_token();
    user_repo::set_verification_token(pool, user.id, &token, Utc::now()).await?;
    mailer.send_verification_email(&user.email, &token).await
}

/// Consume a verification token. Unknown and expired tokens get the same
/// rejection.
pub async fn verify_email(pool: &PgPool, token: &str) -> Result<User, AppError> {
    let user = user_repo::find_by_verification_token(pool, token)
        .await?
        .ok_or(AppError::Validation(
            "確認リンクが無効か期限切れです".to_string(),
        ))?;

    if user.verification_token_expired(Utc::now()) {
        return Err(AppError::Validation(
            "確認リンクが無効か期限切れです".to_string(),
        ));
    }

    Ok(user_repo::mark_email_verified(pool, user.id).await?)
}

/// Start the reset flow. Succeeds whether or not the email exists so the
/// endpoint cannot be used to enumerate accounts.
pub async fn send_password_reset(
    pool: &PgPool,
    mailer: &Mailer,
    email: &str,
) -> Result<(), AppError> {
    let Some(user) = user_repo::find_by_email(pool, email).await? else {
        return Ok(());
    };

    // Provider-created accounts have no password to reset.
    if user.password_hash.is_none() {
        return Ok(());
    }

    let token = security::generate_token();
    user_repo::set_reset_token(pool, user.id, &token, Utc::now()).await?;
    mailer.send_password_reset_email(&user.email, &token).await
}

/// Consume a reset token and set the new password.
pub async fn reset_password(
    pool: &PgPool,
    token: &str,
    new_password: &str,
) -> Result<User, AppError> {
    let user = user_repo::find_by_reset_token(pool, token)
        .await?
        .ok_or(AppError::Validation(
            "再設定リンクが無効か期限切れです".to_string(),
        ))?;

    if user.password_reset_token_expired(Utc::now()) {
        return Err(AppError::Validation(
            "再設定リンクが無効か期限切れです".to_string(),
        ));
    }

    let hash = security::password::hash_password(new_password)?;
    Ok(user_repo::update_password(pool, user.id, &hash).await?)
}
