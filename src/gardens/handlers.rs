//! Garden and garden-plant handlers
//!
//! Every route acts on the caller's own data: a path `user_id` that is not
//! the caller, or a garden owned by someone else, yields 403.

use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::models::{
    AddUserPlant, CreateGardenRequest, Garden, NewGarden, NewUserPlant, UpdateGardenRequest,
    UserPlant,
};
use super::validators::{AddUserPlantsValidator, CreateGardenValidator, UpdateGardenValidator};
use crate::auth::AuthedUser;
use crate::common::{
    generate_garden_id, generate_user_plant_id, ApiError, AppState, DataResponse,
    MessageResponse, Validator,
};

fn ensure_self(authed: &AuthedUser, user_id: &str) -> Result<(), ApiError> {
    if authed.user_id != user_id {
        warn!(caller = %authed.user_id, requested = %user_id, "Cross-user garden access");
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }
    Ok(())
}

/// Load a garden and check the caller owns it
async fn owned_garden(
    state: &AppState,
    authed: &AuthedUser,
    garden_id: &str,
) -> Result<Garden, ApiError> {
    let garden = state.gardens.find_by_id(garden_id).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::NotFound("Garden not found".to_string())
        } else {
            e.into()
        }
    })?;
    ensure_self(authed, &garden.user_id)?;
    Ok(garden)
}

/// GET /api/v1/gardens/users/:user_id
pub async fn list_gardens(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<Vec<Garden>>>, ApiError> {
    ensure_self(&authed, &user_id)?;
    let gardens = state.gardens.find_all_by_user_id(&user_id).await?;
    Ok(Json(DataResponse::new("user's gardens data", gardens)))
}

/// GET /api/v1/gardens/:garden_id/users/:user_id
pub async fn get_garden(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path((garden_id, user_id)): Path<(String, String)>,
) -> Result<Json<DataResponse<Garden>>, ApiError> {
    ensure_self(&authed, &user_id)?;
    let garden = state
        .gardens
        .find_one_by_user_id(&user_id, &garden_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound("Garden not found".to_string())
            } else {
                e.into()
            }
        })?;
    Ok(Json(DataResponse::new("garden data", garden)))
}

/// POST /api/v1/gardens
pub async fn create_garden(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Json(request): Json<CreateGardenRequest>,
) -> Result<(StatusCode, Json<DataResponse<Garden>>), ApiError> {
    CreateGardenValidator.validate(&request).into_result()?;

    let new_garden = NewGarden {
        id: generate_garden_id(),
        user_id: authed.user_id.clone(),
        name: request.name.unwrap_or_default().trim().to_string(),
        location: request.location,
    };
    let garden = state.gardens.create(&new_garden).await?;
    info!(garden_id = %garden.id, user_id = %authed.user_id, "Garden created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Garden created!", garden)),
    ))
}

/// PUT /api/v1/gardens/:garden_id
pub async fn update_garden(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(garden_id): Path<String>,
    Json(request): Json<UpdateGardenRequest>,
) -> Result<Json<DataResponse<Garden>>, ApiError> {
    UpdateGardenValidator.validate(&request).into_result()?;
    owned_garden(&state, &authed, &garden_id).await?;

    let garden = state.gardens.update(&garden_id, &request).await?;
    info!(garden_id = %garden.id, "Garden updated");
    Ok(Json(DataResponse::new("Garden updated!", garden)))
}

/// DELETE /api/v1/gardens/:garden_id
pub async fn delete_garden(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(garden_id): Path<String>,
) -> Result<Json<DataResponse<String>>, ApiError> {
    owned_garden(&state, &authed, &garden_id).await?;

    if !state.gardens.delete(&garden_id).await? {
        return Err(ApiError::NotFound("Garden not found".to_string()));
    }
    info!(garden_id = %garden_id, "Garden deleted");
    Ok(Json(DataResponse::new("Garden deleted!", garden_id)))
}

/// POST /api/v1/user-plants/:garden_id
///
/// # Request Body
/// ```json
/// [{ "plant_id": "P_...", "planted_at": "2024-04-01T08:00:00Z" }]
/// ```
pub async fn add_user_plants(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(garden_id): Path<String>,
    Json(request): Json<Vec<AddUserPlant>>,
) -> Result<(StatusCode, Json<DataResponse<Vec<UserPlant>>>), ApiError> {
    AddUserPlantsValidator.validate(&request).into_result()?;
    owned_garden(&state, &authed, &garden_id).await?;

    let now = Utc::now();
    let rows: Vec<NewUserPlant> = request
        .into_iter()
        .map(|plant| NewUserPlant {
            id: generate_user_plant_id(),
            garden_id: garden_id.clone(),
            plant_id: plant.plant_id.trim().to_string(),
            planted_at: plant.planted_at.unwrap_or(now),
        })
        .collect();

    let inserted = state
        .user_plants
        .bulk_insert(&garden_id, &rows)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                ApiError::NotFound("Plant not found".to_string())
            } else {
                e.into()
            }
        })?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Plant(s) added to your garden!", inserted)),
    ))
}

/// DELETE /api/v1/user-plants
///
/// Body is a JSON array of user-plant ids.
pub async fn remove_user_plants(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Json(ids): Json<Vec<String>>,
) -> Result<Json<MessageResponse>, ApiError> {
    if ids.is_empty() {
        return Err(ApiError::ValidationError(
            "ids: Missing user's plants ids".to_string(),
        ));
    }

    if !state.user_plants.delete(&authed.user_id, &ids).await? {
        return Err(ApiError::NotFound("No matching plants in your gardens".to_string()));
    }
    info!(user_id = %authed.user_id, count = ids.len(), "Plants removed from garden");
    Ok(Json(MessageResponse {
        message: "Plant(s) removed from your garden!".to_string(),
    }))
}
