//! Authentication endpoints. All of these are exempt from the
//! email-verification gate; logout and "who am I" still require a token.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{token_revocation, user_repo};
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::requests::{
    ForgotPasswordRequest, LoginRequest, OauthLoginRequest, RegisterRequest,
    ResendVerificationRequest, ResetPasswordRequest, VerifyEmailRequest,
};
use crate::response;
use crate::security::password;
use crate::services::{audit, verification};

fn auth_attempt(state: &AppState, req: &HttpRequest) -> audit::AuthAttempt {
    audit::AuthAttempt {
        pool: state.db.clone(),
        ip: req
            .connection_info()
            .realip_remote_addr()
            .map(str::to_string),
        user_agent: req
            .headers()
            .get("User-Agent")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
    }
}

pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let password_hash = password::hash_password(&payload.password)?;
    let token = crate::security::generate_token();

    // The unique index arbitrates duplicates; a pre-check would race with
    // concurrent registrations of the same address.
    let user = match user_repo::create_user(
        &state.db,
        &payload.email,
        &payload.name,
        &password_hash,
        &token,
    )
    .await
    {
        Ok(user) => user,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(AppError::Conflict(
                "このメールアドレスは既に登録されています".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    state
        .mailer
        .send_verification_email(&user.email, &token)
        .await?;

    let (session_token, _) = state.jwt.encode(user.id)?;

    Ok(response::created(json!({
        "user": user,
        "token": session_token,
    })))
}

pub async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let attempt = auth_attempt(&state, &req);

    let user = match user_repo::find_by_email(&state.db, &payload.email).await? {
        Some(user) => user,
        None => {
            attempt.record("login.unknown_email", None, false);
            return Err(AppError::InvalidCredentials);
        }
    };

    // Accounts created through an identity provider have no password.
    let Some(hash) = user.password_hash.as_deref() else {
        attempt.record("login.no_password", Some(user.id), false);
        return Err(AppError::InvalidCredentials);
    };

    if !password::verify_password(&payload.password, hash)? {
        attempt.record("login.bad_password", Some(user.id), false);
        return Err(AppError::InvalidCredentials);
    }

    attempt.record("login.success", Some(user.id), true);

    let (session_token, _) = state.jwt.encode(user.id)?;

    Ok(response::ok(json!({
        "user": user,
        "token": session_token,
    })))
}

pub async fn oauth_login(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<OauthLoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let attempt = auth_attempt(&state, &req);

    let identity = state
        .identity_provider
        .verify(&payload.provider_token)
        .await?;

    let user = user_repo::find_or_create_oauth_user(
        &state.db,
        &identity.provider,
        &identity.provider_uid,
        &identity.email,
        &identity.name,
    )
    .await?;

    attempt.record("login.oauth", Some(user.id), true);

    let (session_token, _) = state.jwt.encode(user.id)?;

    Ok(response::ok(json!({
        "user": user,
        "token": session_token,
    })))
}

/// Revokes the presented token's jti until its natural expiry. Repeating a
/// logout is a no-op.
pub async fn logout(
    state: web::Data<AppState>,
    req: HttpRequest,
    current: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let expires_at = DateTime::<Utc>::from_timestamp(current.claims.exp, 0)
        .unwrap_or_else(Utc::now);

    token_revocation::revoke(&state.db, &current.claims.jti, expires_at).await?;

    auth_attempt(&state, &req).record("logout", Some(current.id()), true);

    Ok(response::ok(json!({ "message": "ログアウトしました" })))
}

pub async fn me(current: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(response::ok(json!({ "user": current.user })))
}

pub async fn verify_email(
    state: web::Data<AppState>,
    payload: web::Json<VerifyEmailRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = verification::verify_email(&state.db, &payload.token).await?;

    Ok(response::ok(json!({ "user": user })))
}

/// Always answers 200; whether the address exists is not disclosed.
pub async fn resend_verification(
    state: web::Data<AppState>,
    payload: web::Json<ResendVerificationRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    if let Some(user) = user_repo::find_by_email(&state.db, &payload.email).await? {
        if !user.email_verified {
            verification::send_verification(&state.db, &state.mailer, &user).await?;
        }
    }

    Ok(response::ok(json!({
        "message": "確認メールを送信しました"
    })))
}

/// Always answers 200; whether the address exists is not disclosed.
pub async fn forgot_password(
    state: web::Data<AppState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    verification::send_password_reset(&state.db, &state.mailer, &payload.email).await?;

    Ok(response::ok(json!({
        "message": "再設定メールを送信しました"
    })))
}

pub async fn reset_password(
    state: web::Data<AppState>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = verification::reset_password(&state.db, &payload.token, &payload.password).await?;

    Ok(response::ok(json!({ "user": user })))
}
