// src/auth/service.rs
//! Local registration, login, refresh-token rotation and logout

use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use super::models::{NewAuthProvider, Provider, ProviderKind};
use super::repository::CredentialStore;
use super::tokens::{TokenManager, TokenPair, TokenPayload};
use crate::common::repository::RepoError;
use crate::common::{generate_user_id, safe_email_log, safe_token_log, ApiError};
use crate::users::{NewUser, User, UserStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Refresh token is missing")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Failed to create user")]
    UserCreationFailed,

    #[error("Failed to create auth provider")]
    AuthCreationFailed,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::EmailAlreadyRegistered
            | AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::InvalidRefreshToken => ApiError::Unauthorized(e.to_string()),
            AuthError::InvalidCredentials => ApiError::BadRequest(e.to_string()),
            AuthError::Repo(repo) => repo.into(),
            AuthError::UserCreationFailed
            | AuthError::AuthCreationFailed
            | AuthError::Hashing(_)
            | AuthError::Signing(_) => ApiError::InternalServer(e.to_string()),
        }
    }
}

/// Tokens plus the user they were issued for
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub tokens: TokenPair,
    pub user: User,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<TokenManager>,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<TokenManager>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            credentials,
            tokens,
            bcrypt_cost,
        }
    }

    pub async fn register_local(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        match self.users.find_by_email(email).await {
            Ok(_) => return Err(AuthError::EmailAlreadyRegistered),
            Err(RepoError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;

        let new_user = NewUser {
            id: generate_user_id(),
            email: email.to_string(),
            name: name.to_string(),
            picture_url: None,
        };
        let user = match self.users.insert(&new_user).await {
            Ok(user) => user,
            Err(e) if e.is_unique_violation() => return Err(AuthError::EmailAlreadyRegistered),
            Err(RepoError::NotFound) => return Err(AuthError::UserCreationFailed),
            Err(e) => return Err(e.into()),
        };

        let tokens = match self.tokens.generate_tokens(&payload_for(&user)) {
            Ok(tokens) => tokens,
            Err(e) => {
                self.discard_user(&user.id).await;
                return Err(e.into());
            }
        };

        let credential = NewAuthProvider {
            user_id: user.id.clone(),
            kind: ProviderKind::Local { password_hash },
            refresh_token: Some(tokens.refresh_token.clone()),
        };
        if let Err(e) = self.credentials.insert(&credential).await {
            error!(user_id = %user.id, error = %e, "Failed to create local credential");
            self.discard_user(&user.id).await;
            return Err(AuthError::AuthCreationFailed);
        }

        info!(user_id = %user.id, email = %safe_email_log(&user.email), "User registered");
        Ok(AuthSession { tokens, user })
    }

    pub async fn login_local(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let user = match self.users.find_by_email(email).await {
            Ok(user) => user,
            Err(RepoError::NotFound) => {
                warn!(email = %safe_email_log(email), "Login for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let credential = match self.credentials.find_by_user_id(&user.id, Provider::Local).await {
            Ok(credential) => credential,
            Err(RepoError::NotFound) => return Err(AuthError::InvalidCredentials),
            Err(RepoError::Input(detail)) => {
                warn!(user_id = %user.id, detail = %detail, "Unusable local credential");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };
        let ProviderKind::Local { password_hash } = credential.kind else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &password_hash).await? {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.tokens.generate_tokens(&payload_for(&user))?;
        match self
            .credentials
            .set_refresh_token(&user.id, Some(&tokens.refresh_token))
            .await
        {
            Ok(true) => {}
            Ok(false) => warn!(user_id = %user.id, "No credential row to store refresh token"),
            Err(e) => error!(user_id = %user.id, error = %e, "Failed to store refresh token"),
        }

        info!(user_id = %user.id, "User logged in");
        Ok(AuthSession { tokens, user })
    }

    /// Exchange a stored refresh token for a rotated pair
    pub async fn refresh_access_token(&self, token: &str) -> Result<TokenPair, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let payload = self
            .tokens
            .verify_refresh_token(token)
            .ok_or(AuthError::InvalidToken)?;

        let tokens = self.tokens.generate_tokens(&payload)?;
        let rotated = self
            .credentials
            .rotate_refresh_token(&payload.user_id, token, &tokens.refresh_token)
            .await?;
        if !rotated {
            warn!(
                user_id = %payload.user_id,
                token = %safe_token_log(token),
                "Stale refresh token presented"
            );
            return Err(AuthError::InvalidRefreshToken);
        }

        info!(user_id = %payload.user_id, "Refresh token rotated");
        Ok(tokens)
    }

    /// Clear the stored refresh token; `true` when a row was affected
    pub async fn logout(&self, token: &str) -> Result<bool, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let payload = self
            .tokens
            .verify_refresh_token(token)
            .ok_or(AuthError::InvalidToken)?;

        let cleared = self
            .credentials
            .set_refresh_token(&payload.user_id, None)
            .await?;
        info!(user_id = %payload.user_id, cleared, "User logged out");
        Ok(cleared)
    }

    async fn discard_user(&self, user_id: &str) {
        if let Err(e) = self.users.delete(&[user_id.to_string()]).await {
            error!(user_id = %user_id, error = %e, "Failed to remove partially registered user");
        }
    }
}

fn payload_for(user: &User) -> TokenPayload {
    TokenPayload {
        user_id: user.id.clone(),
        email: user.email.clone(),
    }
}

async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();
    match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
        Ok(Ok(matches)) => Ok(matches),
        Ok(Err(e)) => {
            // An unparseable stored hash can never match
            warn!(error = %e, "Stored password hash rejected by bcrypt");
            Ok(false)
        }
        Err(e) => Err(AuthError::Hashing(e.to_string())),
    }
}
