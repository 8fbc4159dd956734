// src/gardens/validators.rs

use super::models::{AddUserPlant, CreateGardenRequest, UpdateGardenRequest};
use crate::common::{ValidationResult, Validator};

const NAME_MESSAGE: &str = "name must contain at least 4 characters";

fn check_name(result: &mut ValidationResult, name: &str) {
    let name = name.trim();
    if name.chars().count() < 4 {
        result.add_error("name", NAME_MESSAGE);
    } else if name.len() > 255 {
        result.add_error("name", "name must be less than 255 characters");
    }
}

fn check_location(result: &mut ValidationResult, location: &Option<String>) {
    if location.as_ref().is_some_and(|l| l.len() > 255) {
        result.add_error("location", "location must be less than 255 characters");
    }
}

pub struct CreateGardenValidator;

impl Validator<CreateGardenRequest> for CreateGardenValidator {
    fn validate(&self, data: &CreateGardenRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        match &data.name {
            Some(name) => check_name(&mut result, name),
            None => result.add_error("name", "name is required"),
        }
        check_location(&mut result, &data.location);

        result
    }
}

pub struct UpdateGardenValidator;

impl Validator<UpdateGardenRequest> for UpdateGardenValidator {
    fn validate(&self, data: &UpdateGardenRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = &data.name {
            check_name(&mut result, name);
        }
        check_location(&mut result, &data.location);

        result
    }
}

pub struct AddUserPlantsValidator;

impl Validator<Vec<AddUserPlant>> for AddUserPlantsValidator {
    fn validate(&self, data: &Vec<AddUserPlant>) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.is_empty() {
            result.add_error("plants", "At least one plant is required");
        }
        if data.iter().any(|p| p.plant_id.trim().is_empty()) {
            result.add_error("plant_id", "plant_id must not be empty");
        }

        result
    }
}
