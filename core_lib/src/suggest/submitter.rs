use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::endpoint::FormEndpoint;
use super::form::SuggestionForm;
use super::payload::SuggestionPayload;
use super::transport::{HttpTransport, SuggestionTransport};
use crate::config::{FormConfig, StatusMessages};
use crate::error::Result;
use crate::validation::ValidationResult;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    NotConfigured,
    Invalid(ValidationResult),
    AlreadyInFlight,
    Sent,
    Failed,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FormSubmitter {
    endpoint: FormEndpoint,
    transport: Arc<dyn SuggestionTransport>,
    messages: StatusMessages,
    in_flight: AtomicBool,
}

impl FormSubmitter {
    pub fn new(
        endpoint: FormEndpoint,
        transport: Arc<dyn SuggestionTransport>,
        messages: StatusMessages,
    ) -> Self {
        Self {
            endpoint,
            transport,
            messages,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &FormConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(
            FormEndpoint::from_config(config),
            Arc::new(transport),
            config.messages.clone(),
        ))
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    /// Handles one submit of `form`, updating its status element.
    ///
    /// Failures never escape: they end up in the status element and the log.
    pub async fn handle_submit(&self, form: &SuggestionForm) -> SubmitOutcome {
        let Some(_in_flight) = self.begin() else {
            warn!("Suggestion already being sent, ignoring submit");
            return SubmitOutcome::AlreadyInFlight;
        };

        let status = form.status();

        let url = match self.endpoint.url() {
            Ok(url) => url,
            Err(err) => {
                err.log();
                status.set_message(&self.messages.not_configured);
                status.mark_error();
                return SubmitOutcome::NotConfigured;
            }
        };

        let validity = form.report_validity();
        if !validity.is_valid {
            debug!(fields = %validity.summary(), "Suggestion form failed validation");
            status.set_message(&self.messages.invalid);
            status.mark_error();
            return SubmitOutcome::Invalid(validity);
        }

        let payload = SuggestionPayload::from_form(form);

        status.set_message(&self.messages.sending);
        status.clear_marks();

        match self.transport.post_json(url, &payload).await {
            Ok(()) => {
                form.reset();
                status.set_message(&self.messages.success);
                status.mark_success();
                info!(topic = %payload.topic, "Suggestion sent");
                SubmitOutcome::Sent
            }
            Err(err) => {
                err.log();
                status.set_message(&self.messages.failure);
                status.mark_error();
                SubmitOutcome::Failed
            }
        }
    }
}
