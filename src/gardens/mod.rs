//! # Gardens Module
//!
//! Gardens owned by a user and the catalogue plants placed in them.

pub mod handlers;
pub mod models;
pub mod repository;
pub mod validators;

#[cfg(test)]
pub(crate) mod memory;

pub use repository::{GardenRepository, GardenStore, UserPlantRepository, UserPlantStore};

use axum::{
    routing::{get, post, put},
    Router,
};

/// Creates the garden router
///
/// # Routes
/// - `GET /api/v1/gardens/users/:user_id` - Caller's gardens
/// - `GET /api/v1/gardens/:garden_id/users/:user_id` - One garden
/// - `POST /api/v1/gardens` - Create a garden for the caller
/// - `PUT /api/v1/gardens/:garden_id` - Update an owned garden
/// - `DELETE /api/v1/gardens/:garden_id` - Delete an owned garden
/// - `POST /api/v1/user-plants/:garden_id` - Add plants to an owned garden
/// - `DELETE /api/v1/user-plants` - Remove plants from owned gardens
pub fn gardens_routes() -> Router {
    Router::new()
        .route("/api/v1/gardens", post(handlers::create_garden))
        .route("/api/v1/gardens/users/:user_id", get(handlers::list_gardens))
        .route(
            "/api/v1/gardens/:garden_id/users/:user_id",
            get(handlers::get_garden),
        )
        .route(
            "/api/v1/gardens/:garden_id",
            put(handlers::update_garden).delete(handlers::delete_garden),
        )
        .route(
            "/api/v1/user-plants",
            axum::routing::delete(handlers::remove_user_plants),
        )
        .route("/api/v1/user-plants/:garden_id", post(handlers::add_user_plants))
}
