// src/plants/validators.rs

use super::models::{CreateCustomPlantRequest, ExternalPlant};
use crate::common::{ValidationResult, Validator};

pub struct CustomPlantValidator;

impl Validator<CreateCustomPlantRequest> for CustomPlantValidator {
    fn validate(&self, data: &CreateCustomPlantRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.common_name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            result.add_error("common_name", "common_name is required");
        }
        match data.custom_watering_frequency_days {
            None => result.add_error(
                "custom_watering_frequency_days",
                "Custom plants must define a watering frequency!",
            ),
            Some(days) if days <= 0 => result.add_error(
                "custom_watering_frequency_days",
                "Watering frequency must be positive",
            ),
            Some(_) => {}
        }
        if data.watering_frequency_days.is_some_and(|days| days <= 0) {
            result.add_error(
                "watering_frequency_days",
                "Watering frequency must be positive",
            );
        }

        result
    }
}

/// Plants posted back from an external search must keep their identity fields
pub struct ExternalPlantsValidator;

impl Validator<Vec<ExternalPlant>> for ExternalPlantsValidator {
    fn validate(&self, data: &Vec<ExternalPlant>) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.is_empty() {
            result.add_error("plants", "At least one plant is required");
        }
        let incomplete = data.iter().any(|plant| {
            plant.common_name.trim().is_empty()
                || plant.scientific_name.is_empty()
                || plant.family.as_deref().map_or(true, str::is_empty)
        });
        if incomplete {
            result.add_error("plants", "Missing required fields in some plants");
        }

        result
    }
}
