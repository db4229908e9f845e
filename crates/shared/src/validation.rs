use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email format")]
    InvalidEmail,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Checks a submitted name/email pair and reports the first rule it breaks.
///
/// Rules run in order: name present, email present, email shape. The shape
/// check sees the email exactly as submitted, so surrounding whitespace fails it.
pub fn validate_user(name: Option<&str>, email: Option<&str>) -> Result<(), ValidationError> {
    if name.map_or(true, |name| name.trim().is_empty()) {
        return Err(ValidationError::NameRequired);
    }
    let Some(email) = email.filter(|email| !email.trim().is_empty()) else {
        return Err(ValidationError::EmailRequired);
    };
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
