use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::guide_repo;
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::requests::{CreateGuideRequest, GuideQuery, UpdateGuideRequest};
use crate::response::{self, PageMeta};

pub async fn list_guides(
    state: web::Data<AppState>,
    query: web::Query<GuideQuery>,
) -> Result<HttpResponse, AppError> {
    let plant_name = query.plant_name.as_deref();
    let paging = query.paging();

    let meta = PageMeta::new(
        paging.page(),
        paging.per_page(),
        guide_repo::count_guides(&state.db, plant_name).await?,
    );
    let guides =
        guide_repo::list_guides(&state.db, plant_name, meta.per_page, meta.offset()).await?;

    Ok(response::ok_with_meta(json!({ "guides": guides }), meta))
}

pub async fn get_guide(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let guide = guide_repo::find_by_id(&state.db, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("ガイド".to_string()))?;

    Ok(response::ok(json!({ "guide": guide })))
}

pub async fn create_guide(
    state: web::Data<AppState>,
    current: CurrentUser,
    payload: web::Json<CreateGuideRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let guide = guide_repo::create_guide(
        &state.db,
        current.id(),
        &payload.title,
        &payload.plant_name,
        &payload.body,
    )
    .await?;

    Ok(response::created(json!({ "guide": guide })))
}

pub async fn update_guide(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<UpdateGuideRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let guide_id = path.into_inner();

    let guide = guide_repo::find_by_id(&state.db, guide_id)
        .await?
        .ok_or_else(|| AppError::NotFound("ガイド".to_string()))?;

    if guide.user_id != current.id() {
        return Err(AppError::Forbidden);
    }

    let updated = guide_repo::update_guide(
        &state.db,
        guide_id,
        payload.title.as_deref(),
        payload.plant_name.as_deref(),
        payload.body.as_deref(),
    )
    .await?;

    Ok(response::ok(json!({ "guide": updated })))
}

pub async fn delete_guide(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let guide_id = path.into_inner();

    let guide = guide_repo::find_by_id(&state.db, guide_id)
        .await?
        .ok_or_else(|| AppError::NotFound("ガイド".to_string()))?;

    if guide.user_id != current.id() {
        return Err(AppError::Forbidden);
    }

    guide_repo::delete_guide(&state.db, guide_id).await?;

    Ok(response::ok(json!({ "message": "ガイドを削除しました" })))
}
