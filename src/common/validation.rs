// Common validation types, traits and field rules

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    /// Convert into `Err` when any rule failed
    pub fn into_result(self) -> Result<(), ValidationResult> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}

const PASSWORD_SPECIALS: &str = "@$!%*?&";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Check a length range in characters, recording `message` on failure
pub fn check_length(
    result: &mut ValidationResult,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    message: &str,
) {
    let len = value.chars().count();
    if len < min || len > max {
        result.add_error(field, message);
    }
}

/// Password strength rules shared by registration and password changes
pub fn check_password(result: &mut ValidationResult, field: &str, password: &str) {
    let len = password.chars().count();
    if len < 8 {
        result.add_error(field, "Password must be at least 8 characters long");
    }
    if len > 64 {
        result.add_error(field, "Password must be less than 64 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        result.add_error(field, "Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        result.add_error(field, "Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        result.add_error(field, "Password must contain at least one number");
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        result.add_error(field, "Password must contain at least one special character");
    }
}
