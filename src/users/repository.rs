// src/users/repository.rs

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{NewUser, UpdateUserRequest, User};
use crate::common::query_builder::{
    bind_query, bind_query_as, build_insert_columns, build_placeholders, build_update_clauses,
    entry_values, extract_valid_entries, numbered_placeholders, ColumnSet, SqlValue,
};
use crate::common::repository::{require_id, storage_error, RepoError, RepoResult};
use crate::common::safe_email_log;

/// User persistence used by the auth flow and the profile routes
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepoResult<User>;
    async fn find_by_email(&self, email: &str) -> RepoResult<User>;
    async fn insert(&self, data: &NewUser) -> RepoResult<User>;
    async fn update(&self, id: &str, data: &UpdateUserRequest) -> RepoResult<User>;
    /// Returns `true` when at least one row was removed
    async fn delete(&self, ids: &[String]) -> RepoResult<bool>;
}

pub struct UsersRepository {
    db: PgPool,
    columns: ColumnSet,
}

impl UsersRepository {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            columns: ColumnSet::new(&["id", "email", "name", "picture_url"]),
        }
    }
}

#[async_trait]
impl UserStore for UsersRepository {
    async fn find_by_id(&self, id: &str) -> RepoResult<User> {
        require_id(id, "Missing user id")?;
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!("DB error finding user by id: {}", id)))?
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<User> {
        require_id(email, "Email is missing")?;
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!(
                "DB error finding user by email: {}",
                safe_email_log(email)
            )))?
            .ok_or(RepoError::NotFound)
    }

    async fn insert(&self, data: &NewUser) -> RepoResult<User> {
        let entries = extract_valid_entries(Some(data), &self.columns)?;
        let sql = format!(
            "INSERT INTO users ({}) VALUES ({}) RETURNING *",
            build_insert_columns(&entries),
            build_placeholders(&entries)
        );

        bind_query_as(sqlx::query_as::<_, User>(&sql), entry_values(&entries))
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!(
                "DB error creating user: {}",
                safe_email_log(&data.email)
            )))?
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, id: &str, data: &UpdateUserRequest) -> RepoResult<User> {
        require_id(id, "Missing user id")?;
        let entries = extract_valid_entries(Some(data), &self.columns)?;
        let mut values = entry_values(&entries);
        values.push(SqlValue::Text(id.to_string()));
        let sql = format!(
            "UPDATE users SET {} WHERE id = ${} RETURNING *",
            build_update_clauses(&entries),
            values.len()
        );

        bind_query_as(sqlx::query_as::<_, User>(&sql), values)
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!("DB error updating user: {}", id)))?
            .ok_or(RepoError::NotFound)
    }

    async fn delete(&self, ids: &[String]) -> RepoResult<bool> {
        if ids.is_empty() {
            return Err(RepoError::Input("Missing user ids".to_string()));
        }
        let sql = format!(
            "DELETE FROM users WHERE id IN ({})",
            numbered_placeholders(1, ids.len())
        );
        let values = ids.iter().cloned().map(SqlValue::Text).collect();

        let result = bind_query(sqlx::query(&sql), values)
            .execute(&self.db)
            .await
            .map_err(storage_error(format!("DB error deleting users: {:?}", ids)))?;
        Ok(result.rows_affected() > 0)
    }
}
