// src/gardens/repository.rs

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::{info, warn};

use super::models::{Garden, NewGarden, NewUserPlant, UpdateGardenRequest, UserPlant};
use crate::common::query_builder::{
    bind_query, bind_query_as, build_bulk_placeholders, build_insert_columns, build_placeholders,
    build_update_clauses, entry_values, extract_valid_entries, numbered_placeholders,
    quote_identifier, ColumnSet, SqlValue, TableEntries,
};
use crate::common::repository::{require_id, storage_error, RepoError, RepoResult};

#[async_trait]
pub trait GardenStore: Send + Sync {
    async fn find_all_by_user_id(&self, user_id: &str) -> RepoResult<Vec<Garden>>;
    async fn find_one_by_user_id(&self, user_id: &str, garden_id: &str) -> RepoResult<Garden>;
    async fn find_by_id(&self, garden_id: &str) -> RepoResult<Garden>;
    async fn create(&self, data: &NewGarden) -> RepoResult<Garden>;
    async fn update(&self, garden_id: &str, data: &UpdateGardenRequest) -> RepoResult<Garden>;
    async fn delete(&self, garden_id: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait UserPlantStore: Send + Sync {
    /// Insert all rows or none; every `plant_id` must exist
    async fn bulk_insert(&self, garden_id: &str, rows: &[NewUserPlant]) -> RepoResult<Vec<UserPlant>>;
    /// Remove the listed rows that sit in gardens owned by `owner_id`
    async fn delete(&self, owner_id: &str, ids: &[String]) -> RepoResult<bool>;
}

/// Select list over the `VALUES` alias; text-bound timestamp columns are cast back
fn user_plant_select_list(entries: &TableEntries) -> String {
    entries
        .iter()
        .map(|(column, _)| {
            let cast = if column == "planted_at" { "::timestamptz" } else { "" };
            format!("v.{}{}", quote_identifier(column), cast)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct GardenRepository {
    db: PgPool,
    columns: ColumnSet,
}

impl GardenRepository {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            columns: ColumnSet::new(&["id", "user_id", "name", "location"]),
        }
    }
}

#[async_trait]
impl GardenStore for GardenRepository {
    async fn find_all_by_user_id(&self, user_id: &str) -> RepoResult<Vec<Garden>> {
        require_id(user_id, "Missing user id")?;
        sqlx::query_as::<_, Garden>(
            "SELECT * FROM gardens WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(storage_error(format!(
            "DB error finding gardens for user: {}",
            user_id
        )))
    }

    async fn find_one_by_user_id(&self, user_id: &str, garden_id: &str) -> RepoResult<Garden> {
        require_id(user_id, "Missing user id or garden id")?;
        require_id(garden_id, "Missing user id or garden id")?;
        sqlx::query_as::<_, Garden>("SELECT * FROM gardens WHERE id = $1 AND user_id = $2")
            .bind(garden_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!(
                "DB error finding garden {} for user: {}",
                garden_id, user_id
            )))?
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_id(&self, garden_id: &str) -> RepoResult<Garden> {
        require_id(garden_id, "Missing garden id")?;
        sqlx::query_as::<_, Garden>("SELECT * FROM gardens WHERE id = $1")
            .bind(garden_id)
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!("DB error finding garden: {}", garden_id)))?
            .ok_or(RepoError::NotFound)
    }

    async fn create(&self, data: &NewGarden) -> RepoResult<Garden> {
        require_id(&data.user_id, "Missing user id")?;
        let entries = extract_valid_entries(Some(data), &self.columns)?;
        let sql = format!(
            "INSERT INTO gardens ({}) VALUES ({}) RETURNING *",
            build_insert_columns(&entries),
            build_placeholders(&entries)
        );

        bind_query_as(sqlx::query_as::<_, Garden>(&sql), entry_values(&entries))
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!(
                "DB error creating garden for user: {}",
                data.user_id
            )))?
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, garden_id: &str, data: &UpdateGardenRequest) -> RepoResult<Garden> {
        require_id(garden_id, "Missing garden id")?;
        let entries = extract_valid_entries(Some(data), &self.columns)?;
        let mut values = entry_values(&entries);
        values.push(SqlValue::Text(garden_id.to_string()));
        let sql = format!(
            "UPDATE gardens SET {} WHERE id = ${} RETURNING *",
            build_update_clauses(&entries),
            values.len()
        );

        bind_query_as(sqlx::query_as::<_, Garden>(&sql), values)
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!("DB error updating garden: {}", garden_id)))?
            .ok_or(RepoError::NotFound)
    }

    async fn delete(&self, garden_id: &str) -> RepoResult<bool> {
        require_id(garden_id, "Missing garden id")?;
        let result = sqlx::query("DELETE FROM gardens WHERE id = $1")
            .bind(garden_id)
            .execute(&self.db)
            .await
            .map_err(storage_error(format!("DB error deleting garden: {}", garden_id)))?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct UserPlantRepository {
    db: PgPool,
    columns: ColumnSet,
}

impl UserPlantRepository {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            columns: ColumnSet::new(&["id", "garden_id", "plant_id", "planted_at"]),
        }
    }
}

#[async_trait]
impl UserPlantStore for UserPlantRepository {
    async fn bulk_insert(&self, garden_id: &str, rows: &[NewUserPlant]) -> RepoResult<Vec<UserPlant>> {
        require_id(garden_id, "Garden ID is required")?;
        if rows.is_empty() {
            return Err(RepoError::Input("At least one plant is required".to_string()));
        }

        let entries = rows
            .iter()
            .map(|row| extract_valid_entries(Some(row), &self.columns))
            .collect::<Result<Vec<TableEntries>, _>>()?;
        let columns = build_insert_columns(&entries[0]);
        let sql = format!(
            "INSERT INTO user_plants ({columns}) SELECT {} \
             FROM (VALUES {}) AS v({columns}) RETURNING *",
            user_plant_select_list(&entries[0]),
            build_bulk_placeholders(&entries)?,
        );
        let values: Vec<SqlValue> = entries.iter().flat_map(entry_values).collect();

        let plant_ids: HashSet<&str> = rows.iter().map(|row| row.plant_id.as_str()).collect();
        let wanted: Vec<String> = plant_ids.iter().map(|id| id.to_string()).collect();

        let mut tx = self.db.begin().await.map_err(storage_error(format!(
            "DB error opening transaction for garden: {}",
            garden_id
        )))?;

        let known: Vec<String> = sqlx::query_scalar("SELECT id FROM plants WHERE id = ANY($1)")
            .bind(&wanted)
            .fetch_all(&mut *tx)
            .await
            .map_err(storage_error(format!(
                "DB error checking plants for garden: {}",
                garden_id
            )))?;
        if known.len() != plant_ids.len() {
            let mut missing: Vec<&str> = plant_ids
                .into_iter()
                .filter(|id| !known.iter().any(|k| k.as_str() == *id))
                .collect();
            missing.sort_unstable();
            warn!(garden_id = %garden_id, missing = ?missing, "Unknown plant ids in garden insert");
            return Err(RepoError::NotFound);
        }

        let inserted = bind_query_as(sqlx::query_as::<_, UserPlant>(&sql), values)
            .fetch_all(&mut *tx)
            .await
            .map_err(storage_error(format!(
                "DB error bulk inserting {} plant(s) into garden: {}",
                rows.len(),
                garden_id
            )))?;

        tx.commit().await.map_err(storage_error(format!(
            "DB error committing plants for garden: {}",
            garden_id
        )))?;

        info!(garden_id = %garden_id, count = inserted.len(), "Plants added to garden");
        Ok(inserted)
    }

    async fn delete(&self, owner_id: &str, ids: &[String]) -> RepoResult<bool> {
        require_id(owner_id, "Missing user id")?;
        if ids.is_empty() {
            return Err(RepoError::Input("Missing user's plants ids".to_string()));
        }
        let sql = format!(
            "DELETE FROM user_plants up USING gardens g \
             WHERE up.garden_id = g.id AND g.user_id = $1 AND up.id IN ({})",
            numbered_placeholders(2, ids.len())
        );
        let mut values = vec![SqlValue::Text(owner_id.to_string())];
        values.extend(ids.iter().cloned().map(SqlValue::Text));

        let result = bind_query(sqlx::query(&sql), values)
            .execute(&self.db)
            .await
            .map_err(storage_error(format!(
                "DB error deleting user's plants with ids: {:?}",
                ids
            )))?;
        Ok(result.rows_affected() > 0)
    }
}
