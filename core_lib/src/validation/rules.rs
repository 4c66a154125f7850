//! Validation rules and custom validators

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ).unwrap();

    static ref SLUG_REGEX: Regex = Regex::new(
        r"^[a-z0-9]+(?:-[a-z0-9]+)*$"
    ).unwrap();

    // "12:00–13:00", "12:00-13:00", "12:00" or "12"
    static ref TIME_WINDOW_REGEX: Regex = Regex::new(
        r"^\s*([01]?\d|2[0-3])(?::([0-5]\d))?\s*(?:[–-]\s*([01]?\d|2[0-3])(?::([0-5]\d))?\s*)?$"
    ).unwrap();
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_error("required", "This field is required"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(rule_error("email", "Email cannot be empty"));
    }

    if email.len() > 254 {
        return Err(rule_error("email", "Email is too long"));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(rule_error("email", "Invalid email format"));
    }

    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(rule_error("slug", "Slug cannot be empty"));
    }

    if slug.len() > 100 {
        return Err(rule_error("slug", "Slug is too long"));
    }

    if !SLUG_REGEX.is_match(slug) {
        return Err(rule_error(
            "slug",
            "Slug must contain only lowercase letters, numbers, and hyphens",
        ));
    }

    Ok(())
}

pub fn validate_time_window(window: &str) -> Result<(), ValidationError> {
    if !TIME_WINDOW_REGEX.is_match(window) {
        return Err(rule_error(
            "time_window",
            "Time must look like HH:MM or HH:MM–HH:MM",
        ));
    }
    Ok(())
}
