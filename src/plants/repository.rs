// src/plants/repository.rs

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{NewPlant, Plant};
use crate::common::query_builder::{
    bind_query_as, build_bulk_placeholders, build_insert_columns, build_placeholders,
    entry_values, extract_valid_entries, ColumnSet, SqlValue, TableEntries,
};
use crate::common::repository::{require_id, storage_error, RepoError, RepoResult};

#[async_trait]
pub trait PlantStore: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<Plant>>;
    async fn find_by_id(&self, id: &str) -> RepoResult<Plant>;
    async fn find_by_external_api_id(&self, external_api_id: i64) -> RepoResult<Plant>;
    /// Case-insensitive substring match on `common_name`
    async fn search_by_name(&self, query: &str) -> RepoResult<Vec<Plant>>;
    async fn insert(&self, data: &NewPlant) -> RepoResult<Plant>;
    /// One multi-row insert; rows must share a column list
    async fn bulk_insert(&self, rows: &[NewPlant]) -> RepoResult<Vec<Plant>>;
}

pub struct PlantRepository {
    db: PgPool,
    columns: ColumnSet,
}

impl PlantRepository {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            columns: ColumnSet::new(&[
                "id",
                "common_name",
                "family",
                "cultivar",
                "species_epithet",
                "genus",
                "watering_frequency_days",
                "sunlight",
                "external_api_id",
                "is_custom",
                "custom_watering_frequency_days",
                "default_image",
            ]),
        }
    }
}

/// Escape LIKE wildcards so the query matches literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl PlantStore for PlantRepository {
    async fn find_all(&self) -> RepoResult<Vec<Plant>> {
        sqlx::query_as::<_, Plant>("SELECT * FROM plants ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await
            .map_err(storage_error("DB error finding all plants".to_string()))
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Plant> {
        require_id(id, "Missing plant id")?;
        sqlx::query_as::<_, Plant>("SELECT * FROM plants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!("DB error finding plant: {}", id)))?
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_external_api_id(&self, external_api_id: i64) -> RepoResult<Plant> {
        sqlx::query_as::<_, Plant>("SELECT * FROM plants WHERE external_api_id = $1")
            .bind(external_api_id)
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!(
                "DB error finding plant by external api id: {}",
                external_api_id
            )))?
            .ok_or(RepoError::NotFound)
    }

    async fn search_by_name(&self, query: &str) -> RepoResult<Vec<Plant>> {
        require_id(query, "Missing search query")?;
        sqlx::query_as::<_, Plant>(
            "SELECT * FROM plants WHERE common_name ILIKE $1 ORDER BY common_name",
        )
        .bind(like_pattern(query.trim()))
        .fetch_all(&self.db)
        .await
        .map_err(storage_error(format!("DB error searching plants by name: {}", query)))
    }

    async fn insert(&self, data: &NewPlant) -> RepoResult<Plant> {
        let entries = extract_valid_entries(Some(data), &self.columns)?;
        let sql = format!(
            "INSERT INTO plants ({}) VALUES ({}) RETURNING *",
            build_insert_columns(&entries),
            build_placeholders(&entries)
        );

        bind_query_as(sqlx::query_as::<_, Plant>(&sql), entry_values(&entries))
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error(format!(
                "DB error creating plant: {}",
                data.common_name
            )))?
            .ok_or(RepoError::NotFound)
    }

    async fn bulk_insert(&self, rows: &[NewPlant]) -> RepoResult<Vec<Plant>> {
        if rows.is_empty() {
            return Err(RepoError::Input("No plant data provided".to_string()));
        }
        let entries = rows
            .iter()
            .map(|row| extract_valid_entries(Some(row), &self.columns))
            .collect::<Result<Vec<TableEntries>, _>>()?;
        let sql = format!(
            "INSERT INTO plants ({}) VALUES {} RETURNING *",
            build_insert_columns(&entries[0]),
            build_bulk_placeholders(&entries)?
        );
        let values: Vec<SqlValue> = entries.iter().flat_map(entry_values).collect();

        bind_query_as(sqlx::query_as::<_, Plant>(&sql), values)
            .fetch_all(&self.db)
            .await
            .map_err(storage_error(format!(
                "DB error bulk inserting {} plant(s)",
                rows.len()
            )))
    }
}
