//! Plant catalogue handlers

use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use std::sync::Arc;

use super::models::{CreateCustomPlantRequest, ExternalPlant, Plant, PlantSearch, SearchRequest};
use super::validators::{CustomPlantValidator, ExternalPlantsValidator};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, DataResponse, Validator};

/// GET /api/v1/plants
pub async fn list_plants(
    Extension(state): Extension<Arc<AppState>>,
    _authed: AuthedUser,
) -> Result<Json<DataResponse<Vec<Plant>>>, ApiError> {
    let plants = state.plants.list_plants().await?;
    Ok(Json(DataResponse::new("ok!", plants)))
}

/// GET /api/v1/plants/:plant_id
pub async fn get_plant(
    Extension(state): Extension<Arc<AppState>>,
    _authed: AuthedUser,
    Path(plant_id): Path<String>,
) -> Result<Json<DataResponse<Plant>>, ApiError> {
    let plant = state.plants.get_plant(&plant_id).await?;
    Ok(Json(DataResponse::new("ok!", plant)))
}

/// POST /api/v1/plants/search
///
/// # Request Body
/// ```json
/// { "query": "monstera" }
/// ```
///
/// `data` holds `{ source: "local" | "external", data: [...] }`.
pub async fn search_plants(
    Extension(state): Extension<Arc<AppState>>,
    _authed: AuthedUser,
    Json(request): Json<SearchRequest>,
) -> Result<Json<DataResponse<PlantSearch>>, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Missing search query".to_string()));
    }
    let results = state.plants.search_for_plants(query).await?;
    Ok(Json(DataResponse::new("ok!", results)))
}

/// POST /api/v1/plants
///
/// Body is an array of species from an external search; responds with the
/// ids of the plants that were newly stored.
pub async fn save_plants(
    Extension(state): Extension<Arc<AppState>>,
    _authed: AuthedUser,
    Json(request): Json<Vec<ExternalPlant>>,
) -> Result<(StatusCode, Json<DataResponse<Vec<String>>>), ApiError> {
    ExternalPlantsValidator.validate(&request).into_result()?;
    let ids = state.plants.save_plants(&request).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new("ok", ids))))
}

/// POST /api/v1/plants/custom
pub async fn create_custom_plant(
    Extension(state): Extension<Arc<AppState>>,
    _authed: AuthedUser,
    Json(request): Json<CreateCustomPlantRequest>,
) -> Result<(StatusCode, Json<DataResponse<Plant>>), ApiError> {
    CustomPlantValidator.validate(&request).into_result()?;
    let plant = state.plants.create_custom_plant(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Custom plant created!", plant)),
    ))
}
