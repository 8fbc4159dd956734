//! # Plants Module
//!
//! The shared plant catalogue, search with external fallback and import of
//! external species.

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod validators;

#[cfg(test)]
pub(crate) mod memory;
#[cfg(test)]
mod tests;

pub use repository::PlantRepository;
pub use service::PlantsService;

use axum::{
    routing::{get, post},
    Router,
};

/// Creates the plants router
///
/// # Routes
/// - `GET /api/v1/plants` - Whole catalogue
/// - `POST /api/v1/plants` - Import external species
/// - `GET /api/v1/plants/:plant_id` - One plant
/// - `POST /api/v1/plants/search` - Local search with external fallback
/// - `POST /api/v1/plants/custom` - Create a custom plant
pub fn plants_routes() -> Router {
    Router::new()
        .route(
            "/api/v1/plants",
            get(handlers::list_plants).post(handlers::save_plants),
        )
        .route("/api/v1/plants/search", post(handlers::search_plants))
        .route("/api/v1/plants/custom", post(handlers::create_custom_plant))
        .route("/api/v1/plants/:plant_id", get(handlers::get_plant))
}
