//! In-memory plant store and species API for tests

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::models::{ExternalPlant, ExternalPlantDetail, NewPlant, Plant};
use super::repository::PlantStore;
use crate::common::repository::{RepoError, RepoResult};
use crate::services::{ExternalApiError, SpeciesApi};

fn to_plant(row: &NewPlant) -> Plant {
    Plant {
        id: row.id.clone(),
        common_name: row.common_name.clone(),
        family: row.family.clone(),
        cultivar: row.cultivar.clone(),
        species_epithet: row.species_epithet.clone(),
        genus: row.genus.clone(),
        watering_frequency_days: row.watering_frequency_days,
        sunlight: Some(row.sunlight.clone()),
        external_api_id: row.external_api_id,
        is_custom: row.is_custom,
        custom_watering_frequency_days: row.custom_watering_frequency_days,
        default_image: row.default_image.clone(),
        created_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct MemoryPlants {
    pub rows: Mutex<Vec<Plant>>,
}

#[async_trait]
impl PlantStore for MemoryPlants {
    async fn find_all(&self) -> RepoResult<Vec<Plant>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Plant> {
        let rows = self.rows.lock().unwrap();
        rows.iter().find(|p| p.id == id).cloned().ok_or(RepoError::NotFound)
    }

    async fn find_by_external_api_id(&self, external_api_id: i64) -> RepoResult<Plant> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|p| p.external_api_id == Some(external_api_id))
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn search_by_name(&self, query: &str) -> RepoResult<Vec<Plant>> {
        let needle = query.to_lowercase();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|p| p.common_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn insert(&self, data: &NewPlant) -> RepoResult<Plant> {
        let plant = to_plant(data);
        self.rows.lock().unwrap().push(plant.clone());
        Ok(plant)
    }

    async fn bulk_insert(&self, rows: &[NewPlant]) -> RepoResult<Vec<Plant>> {
        let plants: Vec<Plant> = rows.iter().map(to_plant).collect();
        self.rows.lock().unwrap().extend(plants.iter().cloned());
        Ok(plants)
    }
}

/// Canned species catalogue; counts detail lookups
#[derive(Default)]
pub struct FakeSpecies {
    pub search_results: Vec<ExternalPlant>,
    pub details: HashMap<i64, ExternalPlantDetail>,
    pub detail_calls: AtomicUsize,
}

impl FakeSpecies {
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeciesApi for FakeSpecies {
    async fn search_species(&self, _query: &str) -> Result<Vec<ExternalPlant>, ExternalApiError> {
        Ok(self.search_results.clone())
    }

    async fn species_details(
        &self,
        external_id: i64,
    ) -> Result<ExternalPlantDetail, ExternalApiError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .get(&external_id)
            .cloned()
            .ok_or(ExternalApiError::Status(404))
    }
}
