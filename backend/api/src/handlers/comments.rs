use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{comment_repo, notification_repo, post_repo};
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::requests::CreateCommentRequest;
use crate::response;

pub async fn create_comment(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let post_id = path.into_inner();

    let post = post_repo::find_by_id(&state.db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("投稿".to_string()))?;

    let comment =
        comment_repo::create_comment(&state.db, post_id, current.id(), &payload.body).await?;

    if post.user_id != current.id() {
        if let Err(e) = notification_repo::create_notification(
            &state.db,
            post.user_id,
            current.id(),
            "comment",
            Some(post_id),
        )
        .await
        {
            tracing::warn!("failed to create comment notification: {}", e);
        }
    }

    Ok(response::created(json!({ "comment": comment })))
}

pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let post_id = path.into_inner();

    post_repo::find_by_id(&state.db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("投稿".to_string()))?;

    let comments = comment_repo::list_by_post(&state.db, post_id).await?;

    Ok(response::ok(json!({ "comments": comments })))
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let comment_id = path.into_inner();

    let comment = comment_repo::find_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("コメント".to_string()))?;

    if comment.user_id != current.id() {
        return Err(AppError::Forbidden);
    }

    comment_repo::delete_comment(&state.db, comment_id).await?;

    Ok(response::ok(json!({ "message": "コメントを削除しました" })))
}
