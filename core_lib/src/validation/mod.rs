//! Validation results shared by form checks and schedule validation

pub mod rules;

pub use rules::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
        }
    }

    pub fn from_validation_errors(errors: ValidationErrors) -> Self {
        let mut result = Self::success();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                match &error.message {
                    Some(message) => result.add_error(&field, message),
                    None => result.add_error(
                        &field,
                        &format!("Validation failed for field '{}'", field),
                    ),
                }
            }
        }

        result
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }

        for (field, errors) in other.errors {
            self.errors.entry(field).or_default().extend(errors);
        }
    }

    /// Prefixes every field name, used when validating list entries.
    pub fn scoped(self, prefix: &str) -> Self {
        Self {
            is_valid: self.is_valid,
            errors: self
                .errors
                .into_iter()
                .map(|(field, errors)| (format!("{}.{}", prefix, field), errors))
                .collect(),
        }
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, errors)| format!("{}: {}", field, errors.join("; ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub trait Validatable {
    fn validate_comprehensive(&self) -> ValidationResult;
}

impl<T> Validatable for T
where
    T: Validate,
{
    fn validate_comprehensive(&self) -> ValidationResult {
        match self.validate() {
            Ok(_) => ValidationResult::success(),
            Err(errors) => ValidationResult::from_validation_errors(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_error_marks_invalid() {
        let mut result = ValidationResult::success();
        assert!(result.is_valid);

        result.add_error("name", "Name is required");
        result.add_error("name", "Name is too short");

        assert!(!result.is_valid);
        assert_eq!(result.errors["name"].len(), 2);
        assert_eq!(result.summary(), "name: Name is required; Name is too short");
    }

    #[test]
    fn test_merge_and_scope() {
        let mut outer = ValidationResult::success();
        let mut inner = ValidationResult::success();
        inner.add_error("title", "Title is required");

        outer.merge(inner.scoped("upcoming[0]"));

        assert!(!outer.is_valid);
        assert!(outer.has_error("upcoming[0].title"));
    }
}
