//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::repository::RepoError;
use crate::users::User;

/// Credential source stored in `auth_providers.provider`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Local,
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::Google => "google",
        }
    }
}

/// Provider-specific credential material
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderKind {
    Local { password_hash: String },
    Google { external_id: String },
}

impl ProviderKind {
    pub fn provider(&self) -> Provider {
        match self {
            ProviderKind::Local { .. } => Provider::Local,
            ProviderKind::Google { .. } => Provider::Google,
        }
    }
}

/// One credential row per (user, provider)
#[derive(Debug, Clone, PartialEq)]
pub struct AuthProvider {
    pub user_id: String,
    pub kind: ProviderKind,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAuthProvider {
    pub user_id: String,
    pub kind: ProviderKind,
    pub refresh_token: Option<String>,
}

/// Raw `auth_providers` row
#[derive(FromRow, Debug)]
pub struct AuthProviderRow {
    pub user_id: String,
    pub provider: String,
    pub provider_user_id: Option<String>,
    pub password_hash: Option<String>,
    pub refresh_token: Option<String>,
}

impl TryFrom<AuthProviderRow> for AuthProvider {
    type Error = RepoError;

    fn try_from(row: AuthProviderRow) -> Result<Self, Self::Error> {
        let kind = match (row.provider.as_str(), row.password_hash, row.provider_user_id) {
            ("local", Some(password_hash), _) => ProviderKind::Local { password_hash },
            ("google", _, Some(external_id)) => ProviderKind::Google { external_id },
            (provider, _, _) => {
                return Err(RepoError::Input(format!(
                    "Malformed {} credential for user {}",
                    provider, row.user_id
                )))
            }
        };

        Ok(AuthProvider {
            user_id: row.user_id,
            kind,
            refresh_token: row.refresh_token,
        })
    }
}

/// Flat column view of `NewAuthProvider` for the entry builder
#[derive(Serialize, Debug)]
pub struct AuthProviderRecord<'a> {
    pub user_id: &'a str,
    pub provider: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<&'a str>,
}

impl<'a> From<&'a NewAuthProvider> for AuthProviderRecord<'a> {
    fn from(data: &'a NewAuthProvider) -> Self {
        let (password_hash, provider_user_id) = match &data.kind {
            ProviderKind::Local { password_hash } => (Some(password_hash.as_str()), None),
            ProviderKind::Google { external_id } => (None, Some(external_id.as_str())),
        };
        Self {
            user_id: &data.user_id,
            provider: data.kind.provider().as_str(),
            provider_user_id,
            password_hash,
            refresh_token: data.refresh_token.as_deref(),
        }
    }
}

/// POST /api/v1/auth/register body
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// POST /api/v1/auth/login body
#[derive(Deserialize, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Serialize, Debug)]
pub struct LogoutResponse {
    pub message: String,
    pub success: bool,
}
