//! Refresh-token cookie helpers

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use chrono::Duration;

use crate::common::ApiError;

pub const REFRESH_COOKIE: &str = "refreshToken";
const COOKIE_PATH: &str = "/api/v1/auth";

fn cookie_header(value: &str, max_age_secs: i64, secure: bool) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path={}; Max-Age={}",
        REFRESH_COOKIE, value, COOKIE_PATH, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::InternalServer(format!("Invalid cookie header: {}", e)))
}

/// `Set-Cookie` value carrying a freshly issued refresh token
pub fn refresh_cookie(token: &str, ttl: Duration, secure: bool) -> Result<HeaderValue, ApiError> {
    cookie_header(token, ttl.num_seconds(), secure)
}

/// `Set-Cookie` value that expires the refresh cookie
pub fn clear_refresh_cookie(secure: bool) -> Result<HeaderValue, ApiError> {
    cookie_header("", 0, secure)
}

/// Refresh token from the request `Cookie` header, empty when absent
pub fn read_refresh_cookie(headers: &HeaderMap) -> String {
    let prefix = format!("{}=", REFRESH_COOKIE);
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|cookie| cookie.trim().strip_prefix(prefix.as_str()).map(str::to_owned))
        .unwrap_or_default()
}
