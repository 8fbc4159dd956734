//! In-memory user and credential stores for tests

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::models::{AuthProvider, NewAuthProvider, Provider};
use super::repository::CredentialStore;
use crate::common::repository::{RepoError, RepoResult};
use crate::users::models::UpdateUserRequest;
use crate::users::{NewUser, User, UserStore};

#[derive(Default)]
pub struct MemoryUsers {
    pub rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_id(&self, id: &str) -> RepoResult<User> {
        let rows = self.rows.lock().unwrap();
        rows.iter().find(|u| u.id == id).cloned().ok_or(RepoError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<User> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn insert(&self, data: &NewUser) -> RepoResult<User> {
        let user = User {
            id: data.id.clone(),
            email: data.email.clone(),
            name: data.name.clone(),
            picture_url: data.picture_url.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: &str, data: &UpdateUserRequest) -> RepoResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows.iter_mut().find(|u| u.id == id).ok_or(RepoError::NotFound)?;
        if let Some(name) = &data.name {
            user.name = name.clone();
        }
        if let Some(url) = &data.picture_url {
            user.picture_url = Some(url.clone());
        }
        Ok(user.clone())
    }

    async fn delete(&self, ids: &[String]) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| !ids.contains(&u.id));
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryCredentials {
    pub rows: Mutex<Vec<AuthProvider>>,
    pub fail_inserts: AtomicBool,
    /// Users whose stored credential row cannot be decoded
    pub malformed: Mutex<Vec<String>>,
}

impl MemoryCredentials {
    pub fn stored_refresh_token(&self, user_id: &str) -> Option<String> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|c| c.user_id == user_id)
            .and_then(|c| c.refresh_token.clone())
    }

    pub fn fail_next_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn corrupt(&self, user_id: &str) {
        self.malformed.lock().unwrap().push(user_id.to_string());
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentials {
    async fn find_by_user_id(&self, user_id: &str, provider: Provider) -> RepoResult<AuthProvider> {
        if self.malformed.lock().unwrap().iter().any(|id| id == user_id) {
            return Err(RepoError::Input(format!(
                "Malformed {} credential for user {}",
                provider.as_str(),
                user_id
            )));
        }
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|c| c.user_id == user_id && c.kind.provider() == provider)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn insert(&self, data: &NewAuthProvider) -> RepoResult<AuthProvider> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(RepoError::Storage(sqlx::Error::PoolTimedOut));
        }
        let row = AuthProvider {
            user_id: data.user_id.clone(),
            kind: data.kind.clone(),
            refresh_token: data.refresh_token.clone(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn set_refresh_token(&self, user_id: &str, token: Option<&str>) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let mut changed = false;
        for row in rows.iter_mut().filter(|c| c.user_id == user_id) {
            row.refresh_token = token.map(str::to_owned);
            changed = true;
        }
        Ok(changed)
    }

    async fn rotate_refresh_token(
        &self,
        user_id: &str,
        current: &str,
        next: &str,
    ) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let mut changed = false;
        for row in rows
            .iter_mut()
            .filter(|c| c.user_id == user_id && c.refresh_token.as_deref() == Some(current))
        {
            row.refresh_token = Some(next.to_string());
            changed = true;
        }
        Ok(changed)
    }
}
