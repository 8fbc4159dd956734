//! Profile handlers

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tracing::info;

use super::models::{UpdateUserRequest, User};
use super::validators::UpdateUserValidator;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, Validator};

/// GET /api/v1/users/me
pub async fn me_handler(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
) -> Result<Json<User>, ApiError> {
    let user = state.users.find_by_id(&authed.user_id).await?;
    Ok(Json(user))
}

/// PATCH /api/v1/users/me
pub async fn update_me_handler(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    UpdateUserValidator.validate(&request).into_result()?;

    let user = state.users.update(&authed.user_id, &request).await?;
    info!(user_id = %user.id, "Profile updated");
    Ok(Json(user))
}
