use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{growth_record_repo, sequence_repo};
use crate::error::AppError;
use crate::handlers::plants::owned_plant;
use crate::middleware::CurrentUser;
use crate::models::requests::{CreateGrowthRecordRequest, UpdateGrowthRecordRequest};
use crate::response;

/// Creates the record with its number allocated from the per-(user, plant)
/// counter; the insert and the increment commit in one transaction.
pub async fn create_record(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<CreateGrowthRecordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let plant = owned_plant(&state, path.into_inner(), current.id()).await?;

    let recorded_on = payload
        .recorded_on
        .unwrap_or_else(|| Utc::now().date_naive());

    let record = growth_record_repo::create_record(
        &state.db,
        plant.id,
        current.id(),
        &payload.note,
        recorded_on,
    )
    .await?;

    Ok(response::created(json!({ "growth_record": record })))
}

pub async fn list_records(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let plant = owned_plant(&state, path.into_inner(), current.id()).await?;

    let records = growth_record_repo::list_by_plant(&state.db, plant.id).await?;

    Ok(response::ok(json!({ "growth_records": records })))
}

pub async fn update_record(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<UpdateGrowthRecordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let record_id = path.into_inner();

    let record = growth_record_repo::find_by_id(&state.db, record_id)
        .await?
        .ok_or_else(|| AppError::NotFound("成長記録".to_string()))?;

    if record.user_id != current.id() {
        return Err(AppError::Forbidden);
    }

    let updated = growth_record_repo::update_record(
        &state.db,
        record_id,
        payload.note.as_deref(),
        payload.recorded_on,
    )
    .await?;

    Ok(response::ok(json!({ "growth_record": updated })))
}

pub async fn delete_record(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let record_id = path.into_inner();

    let record = growth_record_repo::find_by_id(&state.db, record_id)
        .await?
        .ok_or_else(|| AppError::NotFound("成長記録".to_string()))?;

    if record.user_id != current.id() {
        return Err(AppError::Forbidden);
    }

    growth_record_repo::delete_record(&state.db, record_id).await?;

    Ok(response::ok(json!({ "message": "成長記録を削除しました" })))
}

/// Administrative repair: renumbers every (user, plant) group 1..N by
/// creation time. Exclusive with live allocation; not for the hot path.
pub async fn resequence_all(
    state: web::Data<AppState>,
    _current: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let updated = sequence_repo::resequence_all(&state.db).await?;

    Ok(response::ok(json!({ "updated_records": updated })))
}
