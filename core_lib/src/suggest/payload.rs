use serde::{Deserialize, Serialize};

use super::form::SuggestionForm;

/// JSON body posted to the form endpoint. Values are always trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionPayload {
    pub name: String,
    pub email: String,
    pub topic: String,
    pub details: String,
}

impl SuggestionPayload {
    pub fn new(name: &str, email: &str, topic: &str, details: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            topic: topic.trim().to_string(),
            details: details.trim().to_string(),
        }
    }

    /// Reads the four named fields; a missing field contributes an empty string.
    pub fn from_form(form: &SuggestionForm) -> Self {
        let field = |name: &str| form.field_value(name).unwrap_or_default();
        Self::new(
            &field("name"),
            &field("email"),
            &field("topic"),
            &field("details"),
        )
    }
}
