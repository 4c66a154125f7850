use crate::page::Element;
use crate::validation::{validate_email, validate_required, ValidationResult};

pub const ERROR_CLASS: &str = "error";
pub const SUCCESS_CLASS: &str = "success";

/// The status node shown next to the form.
#[derive(Debug, Clone)]
pub struct StatusDisplay {
    element: Element,
}

impl StatusDisplay {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn text(&self) -> String {
        self.element.text()
    }

    pub fn set_message(&self, message: &str) {
        self.element.set_text(message);
    }

    pub fn mark_error(&self) {
        self.element.add_class(ERROR_CLASS);
    }

    pub fn mark_success(&self) {
        self.element.add_class(SUCCESS_CLASS);
    }

    pub fn clear_marks(&self) {
        self.element.remove_class(ERROR_CLASS);
        self.element.remove_class(SUCCESS_CLASS);
    }

    pub fn is_error(&self) -> bool {
        self.element.has_class(ERROR_CLASS)
    }

    pub fn is_success(&self) -> bool {
        self.element.has_class(SUCCESS_CLASS)
    }
}

/// A suggestion form: named controls under a form element plus its status node.
#[derive(Debug, Clone)]
pub struct SuggestionForm {
    form: Element,
    status: StatusDisplay,
}

impl SuggestionForm {
    pub fn new(form: Element, status: Element) -> Self {
        Self {
            form,
            status: StatusDisplay::new(status),
        }
    }

    /// The usual markup: name, email and topic are required, details is free text.
    pub fn standard() -> Self {
        let input = |name: &str, kind: &str| {
            Element::new("input")
                .with_attribute("name", name)
                .with_attribute("type", kind)
        };

        let status = Element::new("p").with_attribute("id", "sf-status");
        let form = Element::new("form")
            .with_attribute("id", "suggest-form")
            .with_child(input("name", "text").with_attribute("required", ""))
            .with_child(input("email", "email").with_attribute("required", ""))
            .with_child(input("topic", "text").with_attribute("required", ""))
            .with_child(Element::new("textarea").with_attribute("name", "details"))
            .with_child(status.clone());

        Self::new(form, status)
    }

    pub fn element(&self) -> &Element {
        &self.form
    }

    pub fn status(&self) -> &StatusDisplay {
        &self.status
    }

    fn controls(&self) -> Vec<Element> {
        self.form
            .descendants()
            .into_iter()
            .filter(|el| el.has_attribute("name"))
            .collect()
    }

    pub fn field_value(&self, name: &str) -> Option<String> {
        self.form.find_by_name(name).map(|el| el.value())
    }

    /// Returns `false` when the form has no control with that name.
    pub fn set_field(&self, name: &str, value: &str) -> bool {
        match self.form.find_by_name(name) {
            Some(control) => {
                control.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Checks `required` controls and email-typed controls.
    pub fn report_validity(&self) -> ValidationResult {
        let mut result = ValidationResult::success();

        for control in self.controls() {
            let Some(name) = control.attribute("name") else {
                continue;
            };
            let value = control.value();

            if control.has_attribute("required") {
                if let Err(err) = validate_required(&value) {
                    let message = err.message.as_deref().unwrap_or("This field is required");
                    result.add_error(&name, message);
                    continue;
                }
            }

            let trimmed = value.trim();
            if control.attribute("type").as_deref() == Some("email") && !trimmed.is_empty() {
                if let Err(err) = validate_email(trimmed) {
                    let message = err.message.as_deref().unwrap_or("Invalid email format");
                    result.add_error(&name, message);
                }
            }
        }

        result
    }

    pub fn reset(&self) {
        for control in self.controls() {
            control.set_value("");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SuggestionForm {
        let form = SuggestionForm::standard();
        form.set_field("name", "Ada Lovelace");
        form.set_field("email", "ada@example.com");
        form.set_field("topic", "Analytical engines");
        form
    }

    #[test]
    fn test_filled_form_is_valid() {
        assert!(filled().report_validity().is_valid);
    }

    #[test]
    fn test_missing_required_field() {
        let form = filled();
        form.set_field("topic", "");

        let validity = form.report_validity();
        assert!(!validity.is_valid);
        assert!(validity.has_error("topic"));
        assert!(!validity.has_error("details"));
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let form = filled();
        form.set_field("name", "   ");
        assert!(form.report_validity().has_error("name"));
    }

    #[test]
    fn test_malformed_email() {
        let form = filled();
        form.set_field("email", "ada-at-example");
        assert!(form.report_validity().has_error("email"));

        form.set_field("email", "  ada@example.com  ");
        assert!(form.report_validity().is_valid);
    }

    #[test]
    fn test_reset_clears_every_control() {
        let form = filled();
        form.set_field("details", "Some details");
        form.reset();

        for name in ["name", "email", "topic", "details"] {
            assert_eq!(form.field_value(name).as_deref(), Some(""));
        }
    }

    #[test]
    fn test_unknown_field() {
        let form = SuggestionForm::standard();
        assert!(!form.set_field("phone", "555"));
        assert!(form.field_value("phone").is_none());
    }

    #[test]
    fn test_status_marks() {
        let status = SuggestionForm::standard().status().clone();
        status.mark_error();
        status.mark_success();
        assert!(status.is_error() && status.is_success());

        status.clear_marks();
        assert!(!status.is_error());
        assert!(!status.is_success());
    }
}
