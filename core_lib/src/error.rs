//! Application error types and handling

use thiserror::Error;

use crate::validation::ValidationResult;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Form endpoint not configured")]
    NotConfigured,

    #[error("Validation failed: {}", .0.summary())]
    Validation(ValidationResult),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed: {0}")]
    UnexpectedStatus(u16),

    #[error("Invalid target instant: {0}")]
    InvalidTarget(String),

    #[error("Schedule error: {0}")]
    Schedule(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Sends the error detail to the diagnostic log at a level matching its kind.
    pub fn log(&self) {
        match self {
            AppError::NotConfigured | AppError::Validation(_) | AppError::InvalidTarget(_) => {
                tracing::warn!("{}", self);
            }
            AppError::Transport(err) => {
                tracing::error!("Transport error: {:?}", err);
            }
            AppError::UnexpectedStatus(status) => {
                tracing::error!(status = *status, "Endpoint returned a non-success status");
            }
            AppError::Schedule(msg) => {
                tracing::error!("Schedule error: {}", msg);
            }
            AppError::Config(err) => {
                tracing::error!("Configuration error: {:?}", err);
            }
            AppError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
            }
            AppError::JsonError(err) => {
                tracing::error!("JSON error: {:?}", err);
            }
            AppError::YamlError(err) => {
                tracing::error!("YAML error: {:?}", err);
            }
            AppError::Other(err) => {
                tracing::error!("Unexpected error: {:?}", err);
            }
        }
    }
}
