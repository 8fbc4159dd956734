//! # Users Module
//!
//! User records, the `UserStore` persistence seam and the profile routes.

pub mod handlers;
pub mod models;
pub mod repository;
pub mod validators;

pub use models::{NewUser, User};
pub use repository::{UserStore, UsersRepository};

use axum::{routing::get, Router};

/// Creates the profile router
///
/// # Routes
/// - `GET /api/v1/users/me` - Current user
/// - `PATCH /api/v1/users/me` - Update name or picture
pub fn users_routes() -> Router {
    Router::new().route(
        "/api/v1/users/me",
        get(handlers::me_handler).patch(handlers::update_me_handler),
    )
}
