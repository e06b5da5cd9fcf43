//! Chat orchestration - availability check, template lookup, prompt
//! assembly and a single provider call.
//!
//! `ChatOrchestrator::chat` never fails: every path ends in a
//! [`ChatOutcome`], including panics raised below it.

use futures::FutureExt;
use log::{debug, error};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use crate::error::AiError;
use crate::events::{ChatEvent, ChatEventSink, LogEventSink};
use crate::prompt::PromptAssembler;
use crate::providers::ProviderGateway;
use crate::templates::TemplateResolver;
use crate::types::{AuthenticatedUser, ChatOutcome, ChatRequest, ProviderReply};

/// Coordinates one chat request end to end.
#[derive(Clone)]
pub struct ChatOrchestrator {
    gateway: Arc<dyn ProviderGateway>,
    templates: TemplateResolver,
    assembler: PromptAssembler,
    events: Arc<dyn ChatEventSink>,
}

impl ChatOrchestrator {
    pub fn new(gateway: Arc<dyn ProviderGateway>, templates: TemplateResolver) -> Self {
        Self {
            gateway,
            templates,
            assembler: PromptAssembler::new(),
            events: Arc::new(LogEventSink),
        }
    }

    /// Replace the default `log` based event sink.
    pub fn with_event_sink(mut self, events: Arc<dyn ChatEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn is_available(&self) -> bool {
        self.gateway.is_available()
    }

    /// Generate a reply for `request` on behalf of `user`.
    ///
    /// The message is expected to be validated by the caller
    /// (see [`ChatRequest::validate`]). Dropping the returned future cancels
    /// the in-flight provider call.
    pub async fn chat(&self, request: ChatRequest, user: &AuthenticatedUser) -> ChatOutcome {
        self.events.record(ChatEvent::Started {
            user_id: user.id.clone(),
            template_requested: request.template_id.is_some(),
        });

        let outcome = match AssertUnwindSafe(self.run(&request, user))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Chat request panicked for user {}", user.id);
                ChatOutcome::internal()
            }
        };

        self.record_outcome(user, &outcome);
        outcome
    }

    async fn run(&self, request: &ChatRequest, user: &AuthenticatedUser) -> ChatOutcome {
        if !self.gateway.is_available() {
            return ChatOutcome::service_unavailable();
        }

        let template = match self
            .templates
            .resolve(request.template_id.as_deref(), &user.id)
        {
            Ok(template) => template,
            Err(e) => {
                error!("Template lookup failed: {}", e);
                return ChatOutcome::internal();
            }
        };

        if request.template_id.is_some() && template.is_none() {
            debug!("Template not found for user {}, continuing without it", user.id);
        }

        let started = Instant::now();
        let prompt = self.assembler.assemble(
            &request.message,
            &request.history,
            template.as_ref().map(|t| t.content.as_str()),
        );
        let result = self.gateway.generate(&prompt).await;
        let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(ProviderReply {
                text: Some(text),
                model,
            }) => ChatOutcome::Success {
                response_text: text,
                model_used: model.unwrap_or_default(),
                processing_time_ms,
            },
            Ok(ProviderReply { text: None, .. }) => {
                error!("Provider {} returned no text", self.gateway.provider_id());
                ChatOutcome::internal()
            }
            Err(AiError::Provider(failure)) => failure.into(),
            Err(e) => {
                error!("Provider {} fault: {}", self.gateway.provider_id(), e);
                ChatOutcome::internal()
            }
        }
    }

    fn record_outcome(&self, user: &AuthenticatedUser, outcome: &ChatOutcome) {
        let event = match outcome {
            ChatOutcome::Success {
                model_used,
                processing_time_ms,
                ..
            } => ChatEvent::Succeeded {
                user_id: user.id.clone(),
                model: model_used.clone(),
                processing_time_ms: *processing_time_ms,
            },
            ChatOutcome::Failure {
                error_message,
                error_kind,
            } => ChatEvent::Failed {
                user_id: user.id.clone(),
                kind: *error_kind,
                message: error_message.clone(),
            },
        };
        self.events.record(event);
    }
}
