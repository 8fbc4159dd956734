// src/auth/tokens.rs
//! Access/refresh token issuance and verification
//!
//! Tokens are HS256 JWTs. Access and refresh tokens use separate secrets and
//! carry a `kind` claim, so one can never be accepted in place of the other.
//! Verification is fail-soft: any failure yields `None`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Identity carried by both tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: String,
    email: String,
    kind: TokenKind,
    jti: String,
    iat: usize,
    exp: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

pub struct TokenManager {
    access: SigningKeys,
    refresh: SigningKeys,
    validation: Validation,
}

impl TokenManager {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access: SigningKeys::new(access_secret, access_ttl),
            refresh: SigningKeys::new(refresh_secret, refresh_ttl),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Refresh token lifetime, used for the cookie `Max-Age`
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh.ttl
    }

    /// Sign a fresh access/refresh pair for `payload`
    pub fn generate_tokens(
        &self,
        payload: &TokenPayload,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: sign(payload, TokenKind::Access, &self.access)?,
            refresh_token: sign(payload, TokenKind::Refresh, &self.refresh)?,
        })
    }

    pub fn verify_access_token(&self, token: &str) -> Option<TokenPayload> {
        self.verify(token, TokenKind::Access, &self.access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Option<TokenPayload> {
        self.verify(token, TokenKind::Refresh, &self.refresh)
    }

    fn verify(&self, token: &str, kind: TokenKind, keys: &SigningKeys) -> Option<TokenPayload> {
        match decode::<Claims>(token, &keys.decoding, &self.validation) {
            Ok(data) if data.claims.kind == kind => Some(TokenPayload {
                user_id: data.claims.user_id,
                email: data.claims.email,
            }),
            Ok(_) => {
                warn!(expected = ?kind, "Token kind mismatch");
                None
            }
            Err(e) => {
                warn!(error = %e, expected = ?kind, "Token verification failed");
                None
            }
        }
    }
}

fn sign(
    payload: &TokenPayload,
    kind: TokenKind,
    keys: &SigningKeys,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        user_id: payload.user_id.clone(),
        email: payload.email.clone(),
        kind,
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp() as usize,
        exp: (now + keys.ttl).timestamp() as usize,
    };
    encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
}
