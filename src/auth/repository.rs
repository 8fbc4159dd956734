// src/auth/repository.rs

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{AuthProvider, AuthProviderRecord, AuthProviderRow, NewAuthProvider, Provider};
use crate::common::query_builder::{
    bind_query_as, build_insert_columns, build_placeholders, entry_values, extract_valid_entries,
    ColumnSet,
};
use crate::common::repository::{require_id, storage_error, RepoError, RepoResult};

/// Credential persistence; one row per (user, provider)
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_user_id(&self, user_id: &str, provider: Provider) -> RepoResult<AuthProvider>;
    async fn insert(&self, data: &NewAuthProvider) -> RepoResult<AuthProvider>;
    /// Overwrite (or clear) every stored refresh token of the user.
    /// Returns `true` when a row was changed.
    async fn set_refresh_token(&self, user_id: &str, token: Option<&str>) -> RepoResult<bool>;
    /// Replace `current` with `next` only if `current` is still the stored token.
    /// Returns `false` when the stored token no longer matches.
    async fn rotate_refresh_token(
        &self,
        user_id: &str,
        current: &str,
        next: &str,
    ) -> RepoResult<bool>;
}

pub struct AuthProviderRepository {
    db: PgPool,
    columns: ColumnSet,
}

impl AuthProviderRepository {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            columns: ColumnSet::new(&[
                "user_id",
                "provider",
                "provider_user_id",
                "password_hash",
                "refresh_token",
            ]),
        }
    }
}

#[async_trait]
impl CredentialStore for AuthProviderRepository {
    async fn find_by_user_id(&self, user_id: &str, provider: Provider) -> RepoResult<AuthProvider> {
        require_id(user_id, "Missing user id")?;
        let row = sqlx::query_as::<_, AuthProviderRow>(
            "SELECT * FROM auth_providers WHERE user_id = $1 AND provider = $2",
        )
        .bind(user_id)
        .bind(provider.as_str())
        .fetch_optional(&self.db)
        .await
        .map_err(storage_error(format!(
            "DB error finding {} credential for user: {}",
            provider.as_str(),
            user_id
        )))?
        .ok_or(RepoError::NotFound)?;

        AuthProvider::try_from(row)
    }

    async fn insert(&self, data: &NewAuthProvider) -> RepoResult<AuthProvider> {
        let record = AuthProviderRecord::from(data);
        let entries = extract_valid_entries(Some(&record), &self.columns)?;
        let sql = format!(
            "INSERT INTO auth_providers ({}) VALUES ({}) RETURNING *",
            build_insert_columns(&entries),
            build_placeholders(&entries)
        );

        let row = bind_query_as(sqlx::query_as::<_, AuthProviderRow>(&sql), entry_values(&entries))
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!(
                "DB error creating credential for user: {}",
                data.user_id
            )))?
            .ok_or(RepoError::NotFound)?;

        AuthProvider::try_from(row)
    }

    async fn set_refresh_token(&self, user_id: &str, token: Option<&str>) -> RepoResult<bool> {
        require_id(user_id, "Missing user id")?;
        let result = sqlx::query("UPDATE auth_providers SET refresh_token = $1 WHERE user_id = $2")
            .bind(token)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(storage_error(format!(
                "DB error updating refresh token for user: {}",
                user_id
            )))?;
        Ok(result.rows_affected() > 0)
    }

    async fn rotate_refresh_token(
        &self,
        user_id: &str,
        current: &str,
        next: &str,
    ) -> RepoResult<bool> {
        require_id(user_id, "Missing user id")?;
        let result = sqlx::query(
            "UPDATE auth_providers SET refresh_token = $1 \
             WHERE user_id = $2 AND refresh_token = $3",
        )
        .bind(next)
        .bind(user_id)
        .bind(current)
        .execute(&self.db)
        .await
        .map_err(storage_error(format!(
            "DB error rotating refresh token for user: {}",
            user_id
        )))?;
        Ok(result.rows_affected() > 0)
    }
}
