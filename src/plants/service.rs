// src/plants/service.rs
//! Plant search and import from the external species catalogue

use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{info, warn};

use super::models::{
    CreateCustomPlantRequest, ExternalPlant, ExternalPlantDetail, NewPlant, Plant, PlantSearch,
    WateringInterval,
};
use super::repository::PlantStore;
use crate::common::repository::RepoError;
use crate::common::{generate_plant_id, ApiError};
use crate::services::{ExternalApiError, SpeciesApi};

#[derive(Debug, Error)]
pub enum PlantError {
    #[error("External plant API error: {0}")]
    External(#[from] ExternalApiError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<PlantError> for ApiError {
    fn from(e: PlantError) -> Self {
        match e {
            PlantError::External(e) => ApiError::BadGateway(e.to_string()),
            PlantError::Repo(e) => e.into(),
        }
    }
}

fn watering_regex() -> &'static Regex {
    static WATERING: OnceLock<Regex> = OnceLock::new();
    WATERING.get_or_init(|| Regex::new(r"(\d+)(?:\s*-\s*(\d+))?").expect("watering pattern is valid"))
}

/// Parse a watering benchmark such as `"\"7-10\""` or `"5"`
///
/// The upper bound defaults to the lower one. Returns `None` when the text
/// holds no number.
pub fn parse_watering_interval(text: &str) -> Option<WateringInterval> {
    let captures = watering_regex().captures(text)?;
    let min: u32 = captures.get(1)?.as_str().parse().ok()?;
    let max = captures
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(min);
    Some(WateringInterval { min, max })
}

/// Build the catalogue row for an external species; `None` when the
/// details carry no usable watering interval
fn restructure(plant: &ExternalPlant, details: &ExternalPlantDetail) -> Option<NewPlant> {
    let interval = details.watering_text().as_deref().and_then(parse_watering_interval)?;
    if interval.min == 0 {
        return None;
    }
    let watering_frequency_days = i32::try_from(interval.min).ok()?;

    Some(NewPlant {
        id: generate_plant_id(),
        common_name: plant.common_name.clone(),
        family: plant.family.clone(),
        cultivar: plant.cultivar.clone(),
        species_epithet: plant.species_epithet.clone(),
        genus: plant.genus.clone(),
        watering_frequency_days,
        sunlight: details.sunlight.clone(),
        external_api_id: Some(plant.id),
        is_custom: false,
        custom_watering_frequency_days: None,
        default_image: plant
            .default_image
            .as_ref()
            .and_then(|image| image.regular_url.clone()),
    })
}

pub struct PlantsService {
    plants: Arc<dyn PlantStore>,
    species: Arc<dyn SpeciesApi>,
}

impl PlantsService {
    pub fn new(plants: Arc<dyn PlantStore>, species: Arc<dyn SpeciesApi>) -> Self {
        Self { plants, species }
    }

    pub async fn list_plants(&self) -> Result<Vec<Plant>, PlantError> {
        Ok(self.plants.find_all().await?)
    }

    pub async fn get_plant(&self, id: &str) -> Result<Plant, PlantError> {
        Ok(self.plants.find_by_id(id).await?)
    }

    /// Local catalogue first; the external catalogue only when nothing matches
    pub async fn search_for_plants(&self, query: &str) -> Result<PlantSearch, PlantError> {
        let local = self.plants.search_by_name(query).await?;
        if !local.is_empty() {
            return Ok(PlantSearch::Local(local));
        }

        let external = self.species.search_species(query).await?;
        info!(query = %query, results = external.len(), "Falling back to external plant search");
        Ok(PlantSearch::External(external))
    }

    /// Import external species not yet in the catalogue; returns the new ids
    pub async fn save_plants(&self, plants: &[ExternalPlant]) -> Result<Vec<String>, PlantError> {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();

        for plant in plants {
            if !seen.insert(plant.id) {
                continue;
            }
            match self.plants.find_by_external_api_id(plant.id).await {
                Ok(_) => continue,
                Err(RepoError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }

            let details = self.species.species_details(plant.id).await?;
            match restructure(plant, &details) {
                Some(row) => rows.push(row),
                None => warn!(
                    external_api_id = plant.id,
                    "Skipping plant without a watering interval"
                ),
            }
        }

        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let inserted = self.plants.bulk_insert(&rows).await?;
        info!(count = inserted.len(), "External plants saved");
        Ok(inserted.into_iter().map(|plant| plant.id).collect())
    }

    pub async fn create_custom_plant(
        &self,
        request: CreateCustomPlantRequest,
    ) -> Result<Plant, PlantError> {
        let custom_days = request.custom_watering_frequency_days;
        let data = NewPlant {
            id: generate_plant_id(),
            common_name: request.common_name.unwrap_or_default().trim().to_string(),
            family: request.family,
            cultivar: request.cultivar,
            species_epithet: request.species_epithet,
            genus: request.genus,
            watering_frequency_days: request
                .watering_frequency_days
                .or(custom_days)
                .unwrap_or_default(),
            sunlight: request.sunlight,
            external_api_id: None,
            is_custom: true,
            custom_watering_frequency_days: custom_days,
            default_image: request.default_image,
        };
        let plant = self.plants.insert(&data).await?;
        info!(plant_id = %plant.id, "Custom plant created");
        Ok(plant)
    }
}
