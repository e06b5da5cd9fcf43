//! Quill AI - chat orchestration over pluggable LLM providers.
//!
//! This crate turns a user message, prior conversation and an optional
//! stored template into a single provider call, and always answers with a
//! [`ChatOutcome`].
//!
//! # Architecture
//!
//! - `chat`: `ChatOrchestrator`, the request flow and failure envelope
//! - `prompt`: `PromptAssembler`, deterministic prompt construction
//! - `templates`: `TemplateStore` trait and the user-scoped `TemplateResolver`
//! - `providers`: Provider catalog, `ProviderGateway` trait and registry
//! - `rig_provider`: rig-core backed gateway with timeout and error classification
//! - `events`: Chat lifecycle events for logging/telemetry
//! - `types`: Shared DTOs used by the HTTP layer
//! - `env`: Environment abstraction for secrets/config
//!
//! # Example
//!
//! ```ignore
//! use quill_ai::{ChatOrchestrator, ChatRequest, ProviderRegistry, TemplateResolver};
//!
//! // The server implements AiEnvironment over its config
//! let registry = ProviderRegistry::from_environment(&env)?;
//! let orchestrator = ChatOrchestrator::new(
//!     Arc::new(registry),
//!     TemplateResolver::new(template_store),
//! );
//!
//! let outcome = orchestrator
//!     .chat(ChatRequest::new("Hello"), &AuthenticatedUser::new("user-1"))
//!     .await;
//! ```

pub mod chat;
pub mod env;
pub mod error;
pub mod events;
pub mod prompt;
pub mod providers;
pub mod rig_provider;
pub mod templates;
pub mod types;

// Re-export main types for convenience
pub use chat::ChatOrchestrator;
pub use env::{AiEnvironment, DEFAULT_PROVIDER_TIMEOUT};
pub use error::AiError;
pub use events::{ChatEvent, ChatEventSink, LogEventSink};
pub use prompt::PromptAssembler;
pub use providers::{
    ProviderCatalog, ProviderGateway, ProviderInfo, ProviderRegistry, StubProvider, StubResponse,
};
pub use rig_provider::{classify_provider_error, summarize_detail, ProviderKind, RigProvider};
pub use templates::{InMemoryTemplateStore, TemplateResolver, TemplateStore};
pub use types::{
    // Request side
    AuthenticatedUser, ChatHistory, ChatMessage, ChatMessageRole, ChatRequest, Template,
    // Prompt and provider side
    AssembledPrompt, PromptTurn, ProviderErrorKind, ProviderFailure, ProviderReply,
    // Outcome envelope
    ChatErrorKind, ChatOutcome,
    // Constants
    INTERNAL_ERROR_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE, UNKNOWN_ERROR_MESSAGE,
};
