//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Local registration and login with bcrypt password hashes
//! - Access/refresh JWT issuance, verification and rotation
//! - The refresh-token cookie
//! - AuthedUser extractor for protected routes

pub mod cookies;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;
pub mod tokens;
pub mod validators;

#[cfg(test)]
pub(crate) mod memory;

pub use extractors::AuthedUser;
pub use repository::AuthProviderRepository;
pub use routes::auth_routes;
pub use service::AuthService;
pub use tokens::TokenManager;
