//! Suggestion form submission

pub mod endpoint;
pub mod form;
pub mod payload;
pub mod submitter;
pub mod transport;

pub use endpoint::{FormEndpoint, ENDPOINT_PLACEHOLDER};
pub use form::{StatusDisplay, SuggestionForm, ERROR_CLASS, SUCCESS_CLASS};
pub use payload::SuggestionPayload;
pub use submitter::{FormSubmitter, SubmitOutcome};
pub use transport::{HttpTransport, SuggestionTransport};
