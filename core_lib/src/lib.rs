//! Core library for the talks site: suggestion form submission, countdown
//! rendering and the talk schedule behind them.

pub mod config;
pub mod countdown;
pub mod error;
pub mod page;
pub mod schedule;
pub mod suggest;
pub mod validation;

pub use config::AppConfig;
pub use countdown::{Clock, CountdownState, CountdownWidget, ManualClock, RemainingDuration, SystemClock};
pub use error::{AppError, Result};
pub use page::{Element, Page, ReadyState};
pub use schedule::{generate_talk_pages, load_dashboard, Dashboard, Talk};
pub use suggest::{FormEndpoint, FormSubmitter, SubmitOutcome, SuggestionForm, SuggestionPayload};
pub use validation::{Validatable, ValidationResult};
