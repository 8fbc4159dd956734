//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/v1/auth/register` - Local registration
/// - `POST /api/v1/auth/login` - Local login
/// - `POST /api/v1/auth/refresh` - Rotate the refresh cookie, issue an access token
/// - `POST /api/v1/auth/logout` - Clear the stored refresh token
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/v1/auth/register", post(handlers::register_handler))
        .route("/api/v1/auth/login", post(handlers::login_handler))
        .route("/api/v1/auth/refresh", post(handlers::refresh_handler))
        .route("/api/v1/auth/logout", post(handlers::logout_handler))
}
