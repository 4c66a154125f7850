use crate::config::FormConfig;
use crate::error::{AppError, Result};

/// Marker left in the endpoint until a real form-collection URL is set.
pub const ENDPOINT_PLACEHOLDER: &str = "FORM_ENDPOINT_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEndpoint {
    url: Option<String>,
}

impl FormEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    pub fn unset() -> Self {
        Self { url: None }
    }

    pub fn from_config(config: &FormConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn is_configured(&self) -> bool {
        match &self.url {
            Some(url) => !url.trim().is_empty() && !url.contains(ENDPOINT_PLACEHOLDER),
            None => false,
        }
    }

    pub fn url(&self) -> Result<&str> {
        match &self.url {
            Some(url) if self.is_configured() => Ok(url.trim()),
            _ => Err(AppError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_endpoint() {
        let endpoint = FormEndpoint::new("https://forms.example.com/f/abc123");
        assert!(endpoint.is_configured());
        assert_eq!(endpoint.url().unwrap(), "https://forms.example.com/f/abc123");
    }

    #[test]
    fn test_unconfigured_endpoints() {
        assert!(!FormEndpoint::unset().is_configured());
        assert!(!FormEndpoint::new("").is_configured());
        assert!(!FormEndpoint::new("   ").is_configured());
        assert!(!FormEndpoint::new(ENDPOINT_PLACEHOLDER).is_configured());
        assert!(!FormEndpoint::new("https://forms.example.com/f/FORM_ENDPOINT_URL").is_configured());

        assert!(matches!(FormEndpoint::unset().url(), Err(AppError::NotConfigured)));
    }

    #[test]
    fn test_default_config_is_unconfigured() {
        let endpoint = FormEndpoint::from_config(&FormConfig::default());
        assert!(!endpoint.is_configured());
    }
}
