use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::app_state::AppState;
use crate::db::notification_repo;
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::requests::PageQuery;
use crate::response::{self, PageMeta};

pub async fn list_notifications(
    state: web::Data<AppState>,
    current: CurrentUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let meta = PageMeta::new(
        query.page(),
        query.per_page(),
        notification_repo::count_by_user(&state.db, current.id()).await?,
    );
    let notifications = notification_repo::list_by_user(
        &state.db,
        current.id(),
        meta.per_page,
        meta.offset(),
    )
    .await?;

    Ok(response::ok_with_meta(
        json!({ "notifications": notifications }),
        meta,
    ))
}

pub async fn unread_count(
    state: web::Data<AppState>,
    current: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let count = notification_repo::count_unread(&state.db, current.id()).await?;
    Ok(response::ok(json!({ "unread_count": count })))
}

pub async fn mark_read(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let updated = notification_repo::mark_read(&state.db, path.into_inner(), current.id()).await?;

    if updated == 0 {
        return Err(AppError::NotFound("通知".to_string()));
    }

    Ok(response::ok(json!({ "message": "通知を既読にしました" })))
}

pub async fn mark_all_read(
    state: web::Data<AppState>,
    current: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let updated = notification_repo::mark_all_read(&state.db, current.id()).await?;

    Ok(response::ok(json!({ "marked_read": updated })))
}
