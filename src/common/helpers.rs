// Helper functions for safe logging

use serde_json::Value;

/// JSON keys whose values never reach the logs
const SENSITIVE_KEYS: [&str; 5] = [
    "password",
    "confirmPassword",
    "accessToken",
    "refreshToken",
    "password_hash",
];

/// Masks email addresses for safe logging
///
/// # Example
/// ```
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 && !parts[0].is_empty() {
            let first = parts[0].chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 && token.is_ascii() {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Replace credential-bearing fields anywhere in a JSON document
pub fn redact_sensitive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                if SENSITIVE_KEYS.contains(&key.as_str()) {
                    *inner = Value::String("[REDACTED]".to_string());
                } else {
                    redact_sensitive(inner);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_sensitive),
        _ => {}
    }
}
