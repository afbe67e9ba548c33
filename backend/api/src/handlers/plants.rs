use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::plant_repo;
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::requests::{CreatePlantRequest, UpdatePlantRequest};
use crate::models::Plant;
use crate::response;

/// Load a plant and require the caller to own it.
pub(crate) async fn owned_plant(
    state: &AppState,
    plant_id: i64,
    user_id: i64,
) -> Result<Plant, AppError> {
    let plant = plant_repo::find_by_id(&state.db, plant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("栽培植物".to_string()))?;

    if plant.user_id != user_id {
        return Err(AppError::Forbidden);
    }

    Ok(plant)
}

pub async fn list_plants(
    state: web::Data<AppState>,
    current: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let plants = plant_repo::list_by_user(&state.db, current.id()).await?;
    Ok(response::ok(json!({ "plants": plants })))
}

pub async fn get_plant(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let plant = owned_plant(&state, path.into_inner(), current.id()).await?;
    Ok(response::ok(json!({ "plant": plant })))
}

pub async fn create_plant(
    state: web::Data<AppState>,
    current: CurrentUser,
    payload: web::Json<CreatePlantRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let plant = plant_repo::create_plant(
        &state.db,
        current.id(),
        &payload.name,
        payload.variety.as_deref(),
        payload.planted_on,
    )
    .await?;

    Ok(response::created(json!({ "plant": plant })))
}

pub async fn update_plant(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
    payload: web::Json<UpdatePlantRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let plant = owned_plant(&state, path.into_inner(), current.id()).await?;

    let updated = plant_repo::update_plant(
        &state.db,
        plant.id,
        payload.name.as_deref(),
        payload.variety.as_deref(),
        payload.planted_on,
    )
    .await?;

    Ok(response::ok(json!({ "plant": updated })))
}

pub async fn delete_plant(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let plant = owned_plant(&state, path.into_inner(), current.id()).await?;

    plant_repo::delete_plant(&state.db, plant.id).await?;

    Ok(response::ok(json!({ "message": "栽培植物を削除しました" })))
}
