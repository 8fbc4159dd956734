// src/auth/validators.rs

use super::models::{LoginRequest, RegisterRequest};
use crate::common::validation::{check_length, check_password, is_valid_email};
use crate::common::{ValidationResult, Validator};

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        match data.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => check_length(
                &mut result,
                "name",
                name,
                2,
                50,
                "Name must be between 2 and 50 characters",
            ),
            _ => result.add_error("name", "Name is required"),
        }

        match data.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => {
                if !is_valid_email(email) {
                    result.add_error("email", "Invalid email address");
                }
            }
            _ => result.add_error("email", "Email is required"),
        }

        match data.password.as_deref() {
            Some(password) if !password.is_empty() => {
                check_password(&mut result, "password", password);
                if data.confirm_password.as_deref() != Some(password) {
                    result.add_error("confirmPassword", "Passwords do not match");
                }
            }
            _ => result.add_error("password", "Password is required"),
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        match data.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => {
                if !is_valid_email(email) {
                    result.add_error("email", "Invalid email address");
                }
            }
            _ => result.add_error("email", "Email is required"),
        }

        if data.password.as_deref().map_or(true, str::is_empty) {
            result.add_error("password", "Password is required");
        }

        result
    }
}
