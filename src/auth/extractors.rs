//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated caller
///
/// Validates the `Authorization: Bearer <access token>` header against the
/// access-token secret. No database lookup is made.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let token = match parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        {
            Some(t) => t,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".into()));
            }
        };
        let bare_token = token.strip_prefix("Bearer ").unwrap_or(token);

        match app_state.tokens.verify_access_token(bare_token) {
            Some(payload) => {
                debug!(
                    user_id = %payload.user_id,
                    email = %safe_email_log(&payload.email),
                    "Access token accepted"
                );
                Ok(AuthedUser {
                    user_id: payload.user_id,
                })
            }
            None => Err(ApiError::Unauthorized("Invalid token".into())),
        }
    }
}
