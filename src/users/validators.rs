// src/users/validators.rs

use super::models::UpdateUserRequest;
use crate::common::validation::check_length;
use crate::common::{ValidationResult, Validator};

pub struct UpdateUserValidator;

impl Validator<UpdateUserRequest> for UpdateUserValidator {
    fn validate(&self, data: &UpdateUserRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = &data.name {
            check_length(
                &mut result,
                "name",
                name.trim(),
                2,
                50,
                "Name must be between 2 and 50 characters",
            );
        }
        if let Some(url) = &data.picture_url {
            if url.len() > 2048 {
                result.add_error("picture_url", "Picture URL must be less than 2048 characters");
            }
        }
        if data.name.is_none() && data.picture_url.is_none() {
            result.add_error("body", "No valid fields");
        }

        result
    }
}
