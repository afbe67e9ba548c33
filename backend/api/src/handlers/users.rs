use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{follow_repo, notification_repo, user_repo};
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::requests::UpdateProfileRequest;
use crate::models::UserProfile;
use crate::response;

pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = user_repo::find_by_id(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("ユーザー".to_string()))?;

    Ok(response::ok(json!({ "user": UserProfile::from(&user) })))
}

pub async fn update_me(
    state: web::Data<AppState>,
    current: CurrentUser,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = match payload.name.as_deref() {
        Some(name) => user_repo::update_name(&state.db, current.id(), name).await?,
        None => current.user,
    };

    Ok(response::ok(json!({ "user": user })))
}

pub async fn follow(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let target_id = path.into_inner();

    if target_id == current.id() {
        return Err(AppError::Validation(
            "自分自身はフォローできません".to_string(),
        ));
    }

    user_repo::find_by_id(&state.db, target_id)
        .await?
        .ok_or_else(|| AppError::NotFound("ユーザー".to_string()))?;

    let follow = follow_repo::create_follow(&state.db, current.id(), target_id).await?;

    if let Err(e) =
        notification_repo::create_notification(&state.db, target_id, current.id(), "follow", None)
            .await
    {
        tracing::warn!("failed to create follow notification: {}", e);
    }

    Ok(response::created(json!({ "follow": follow })))
}

pub async fn unfollow(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let deleted = follow_repo::delete_follow(&state.db, current.id(), path.into_inner()).await?;

    if deleted == 0 {
        return Err(AppError::NotFound("フォロー".to_string()));
    }

    Ok(response::ok(json!({ "message": "フォローを解除しました" })))
}

pub async fn followers(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let users = follow_repo::list_followers(&state.db, path.into_inner()).await?;
    Ok(response::ok(json!({ "users": users })))
}

pub async fn following(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let users = follow_repo::list_following(&state.db, path.into_inner()).await?;
    Ok(response::ok(json!({ "users": users })))
}
