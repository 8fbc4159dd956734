//! Authentication handlers

use axum::extract::{Extension, Json};
use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode};
use std::sync::Arc;
use tracing::info;

use super::cookies::{clear_refresh_cookie, read_refresh_cookie, refresh_cookie};
use super::models::{
    AccessTokenResponse, LoginRequest, LogoutResponse, RegisterRequest, SessionResponse,
};
use super::validators::{LoginValidator, RegisterValidator};
use crate::common::{safe_email_log, ApiError, AppState, Validator};

type WithCookie<T> = (StatusCode, [(axum::http::HeaderName, HeaderValue); 1], Json<T>);

fn session_cookie(state: &AppState, refresh_token: &str) -> Result<HeaderValue, ApiError> {
    refresh_cookie(
        refresh_token,
        state.tokens.refresh_ttl(),
        state.config.cookie_secure,
    )
}

/// POST /api/v1/auth/register
///
/// # Request Body
/// ```json
/// { "name": "Ada", "email": "ada@example.com", "password": "Secret1!", "confirmPassword": "Secret1!" }
/// ```
///
/// Responds 201 with `{ accessToken, user }` and sets the `refreshToken` cookie.
pub async fn register_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<WithCookie<SessionResponse>, ApiError> {
    RegisterValidator.validate(&request).into_result()?;

    let name = request.name.as_deref().unwrap_or_default().trim();
    let email = request.email.as_deref().unwrap_or_default().trim();
    let password = request.password.as_deref().unwrap_or_default();
    info!(email = %safe_email_log(email), "Registration request");

    let session = state.auth.register_local(name, email, password).await?;
    let cookie = session_cookie(&state, &session.tokens.refresh_token)?;

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(SessionResponse {
            access_token: session.tokens.access_token,
            user: session.user,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn login_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<WithCookie<SessionResponse>, ApiError> {
    LoginValidator.validate(&request).into_result()?;

    let email = request.email.as_deref().unwrap_or_default().trim();
    let password = request.password.as_deref().unwrap_or_default();

    let session = state.auth.login_local(email, password).await?;
    let cookie = session_cookie(&state, &session.tokens.refresh_token)?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(SessionResponse {
            access_token: session.tokens.access_token,
            user: session.user,
        }),
    ))
}

/// POST /api/v1/auth/refresh
///
/// Reads the `refreshToken` cookie and rotates it.
pub async fn refresh_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<WithCookie<AccessTokenResponse>, ApiError> {
    let token = read_refresh_cookie(&headers);
    let tokens = state.auth.refresh_access_token(&token).await?;
    let cookie = session_cookie(&state, &tokens.refresh_token)?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(AccessTokenResponse {
            access_token: tokens.access_token,
        }),
    ))
}

/// POST /api/v1/auth/logout
pub async fn logout_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<WithCookie<LogoutResponse>, ApiError> {
    let token = read_refresh_cookie(&headers);
    let success = state.auth.logout(&token).await?;
    let cookie = clear_refresh_cookie(state.config.cookie_secure)?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(LogoutResponse {
            message: "Logged out successfully".to_string(),
            success,
        }),
    ))
}
