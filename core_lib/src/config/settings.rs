use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::suggest::ENDPOINT_PLACEHOLDER;

pub const CONFIG_FILE_STEM: &str = "talkboard";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub form: FormConfig,
    pub countdown: CountdownConfig,
    pub schedule: ScheduleConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub endpoint: String,
    /// Zero disables the request timeout.
    pub request_timeout_seconds: u64,
    pub messages: StatusMessages,
}

/// Texts written into the status element at each stage of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessages {
    pub not_configured: String,
    pub invalid: String,
    pub sending: String,
    pub success: String,
    pub failure: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    pub marker_class: String,
    pub start_attribute: String,
    pub output_class: String,
    pub live_text: String,
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub paths: Vec<PathBuf>,
    pub talks_dir: PathBuf,
    /// Where pages for talks without a hand-written page are written.
    pub generated_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Unset means `debug` in debug builds and `info` otherwise.
    pub level: Option<String>,
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            form: FormConfig::default(),
            countdown: CountdownConfig::default(),
            schedule: ScheduleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint: ENDPOINT_PLACEHOLDER.to_string(),
            request_timeout_seconds: 0,
            messages: StatusMessages::default(),
        }
    }
}

impl Default for StatusMessages {
    fn default() -> Self {
        Self {
            not_configured: "Form endpoint not configured yet.".to_string(),
            invalid: "Please fill the required fields.".to_string(),
            sending: "Sending…".to_string(),
            success: "Thanks! Your suggestion has been sent to the L&D team.".to_string(),
            failure: "Sorry, something went wrong. Please try again later.".to_string(),
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            marker_class: "countdown".to_string(),
            start_attribute: "data-start".to_string(),
            output_class: "cd-out".to_string(),
            live_text: "Live now".to_string(),
            tick_interval_ms: 1000,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("data/schedule.yml"),
                PathBuf::from("schedule.yml"),
            ],
            talks_dir: PathBuf::from("docs/talks"),
            generated_dir: PathBuf::from("docs/_generated"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            json: false,
        }
    }
}

impl LoggingConfig {
    /// The configured level when one is set, otherwise the build default.
    pub fn effective_level(&self, debug_build: bool) -> &str {
        match self.level.as_deref().map(str::trim) {
            Some(level) if !level.is_empty() => level,
            _ if debug_build => "debug",
            _ => "info",
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new(&format!("{}.toml", CONFIG_FILE_STEM)).exists() {
            builder = builder.add_source(File::with_name(CONFIG_FILE_STEM));
        }

        builder = builder.add_source(
            Environment::with_prefix("TALKBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.countdown.tick_interval_ms == 0 {
            return Err(ConfigError::Message(
                "Countdown tick interval must be greater than 0".to_string(),
            ));
        }

        if self.countdown.marker_class.trim().is_empty() {
            return Err(ConfigError::Message(
                "Countdown marker class cannot be empty".to_string(),
            ));
        }

        if self.countdown.start_attribute.trim().is_empty() {
            return Err(ConfigError::Message(
                "Countdown start attribute cannot be empty".to_string(),
            ));
        }

        if self.countdown.output_class.trim().is_empty() {
            return Err(ConfigError::Message(
                "Countdown output class cannot be empty".to_string(),
            ));
        }

        if self.schedule.paths.is_empty() {
            return Err(ConfigError::Message(
                "At least one schedule path is required".to_string(),
            ));
        }

        if self.form.endpoint.contains(ENDPOINT_PLACEHOLDER) || self.form.endpoint.trim().is_empty() {
            tracing::warn!("Form endpoint is not configured - suggestions will not be sent");
        }

        Ok(())
    }
}
