use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{like_repo, notification_repo, post_repo};
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::requests::{CreatePostRequest, PageQuery, UpdatePostRequest};
use crate::response::{self, PageMeta};

pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let meta = PageMeta::new(
        query.page(),
        query.per_page(),
        post_repo::count_all(&state.db).await?,
    );
    let posts = post_repo::list_recent(&state.db, meta.per_page, meta.offset()).await?;

    Ok(response::ok_with_meta(json!({ "posts": posts }), meta))
}

pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let post_id = path.into_inner();
    let post = post_repo::find_by_id(&state.db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("投稿".to_string()))?;

    let like_count = like_repo::count_by_post(&state.db, post_id).await?;

    Ok(response::ok(json!({ "post": post, "like_count": like_count })))
}

pub async fn create_post(
    state: web::Data<AppState>,
    current: CurrentUser,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let post = post_repo::create_post(&state.db, current.id(), &payload.title, &payload.body)
        .await?;

    Ok(response::created(json!({ "post": post })))
}

pub async fn update_post(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let post_id = path.into_inner();

    let post = post_repo::find_by_id(&state.db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("投稿".to_string()))?;

    if post.user_id != current.id() {
        return Err(AppError::Forbidden);
    }

    let updated = post_repo::update_post(
        &state.db,
        post_id,
        payload.title.as_deref(),
        payload.body.as_deref(),
    )
    .await?;

    Ok(response::ok(json!({ "post": updated })))
}

pub async fn delete_post(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let post_id = path.into_inner();

    let post = post_repo::find_by_id(&state.db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("投稿".to_string()))?;

    if post.user_id != current.id() {
        return Err(AppError::Forbidden);
    }

    post_repo::delete_post(&state.db, post_id).await?;

    Ok(response::ok(json!({ "message": "投稿を削除しました" })))
}

pub async fn like_post(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let post_id = path.into_inner();

    let post = post_repo::find_by_id(&state.db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("投稿".to_string()))?;

    let like = like_repo::create_like(&state.db, post_id, current.id()).await?;

    if post.user_id != current.id() {
        if let Err(e) = notification_repo::create_notification(
            &state.db,
            post.user_id,
            current.id(),
            "like",
            Some(post_id),
        )
        .await
        {
            tracing::warn!("failed to create like notification: {}", e);
        }
    }

    Ok(response::created(json!({ "like": like })))
}

pub async fn unlike_post(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let deleted = like_repo::delete_like(&state.db, path.into_inner(), current.id()).await?;

    if deleted == 0 {
        return Err(AppError::NotFound("いいね".to_string()));
    }

    Ok(response::ok(json!({ "message": "いいねを取り消しました" })))
}
