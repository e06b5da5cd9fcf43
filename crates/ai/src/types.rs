//! Shared types for the chat core - requests, messages, prompts and outcomes.
//!
//! These types are serialized by the HTTP binding, so the wire names are
//! camelCase like the rest of the API.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AiError;

// ============================================================================
// Chat Messages
// ============================================================================

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for ChatMessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatMessageRole::User => write!(f, "user"),
            ChatMessageRole::Assistant => write!(f, "assistant"),
            ChatMessageRole::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for ChatMessageRole {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ChatMessageRole::User),
            "assistant" => Ok(ChatMessageRole::Assistant),
            "system" => Ok(ChatMessageRole::System),
            _ => Err(AiError::invalid_input(format!("Unknown role: {}", s))),
        }
    }
}

/// A single conversational turn supplied by the caller.
///
/// Content is never empty; the only way to build one is through
/// [`ChatMessage::new`] (or deserialization, which goes through it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChatMessage")]
pub struct ChatMessage {
    role: ChatMessageRole,
    content: String,
}

#[derive(Deserialize)]
struct RawChatMessage {
    role: ChatMessageRole,
    content: String,
}

impl TryFrom<RawChatMessage> for ChatMessage {
    type Error = AiError;

    fn try_from(raw: RawChatMessage) -> Result<Self, Self::Error> {
        ChatMessage::new(raw.role, raw.content)
    }
}

impl ChatMessage {
    /// Create a message, rejecting empty or whitespace-only content.
    pub fn new(role: ChatMessageRole, content: impl Into<String>) -> Result<Self, AiError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(AiError::invalid_input(format!(
                "{} message content must not be empty",
                role
            )));
        }
        Ok(Self { role, content })
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Result<Self, AiError> {
        Self::new(ChatMessageRole::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Result<Self, AiError> {
        Self::new(ChatMessageRole::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Result<Self, AiError> {
        Self::new(ChatMessageRole::System, content)
    }

    pub fn role(&self) -> ChatMessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Conversation history, oldest first.
pub type ChatHistory = Vec<ChatMessage>;

// ============================================================================
// Templates and Users
// ============================================================================

/// A reusable prompt prefix owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// May be empty, never absent.
    pub content: String,
}

/// The caller identity resolved by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

// ============================================================================
// Request
// ============================================================================

/// Request to generate a reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The new user message.
    pub message: String,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub history: ChatHistory,
    /// Optional template to prepend as system context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_history(mut self, history: ChatHistory) -> Self {
        self.history = history;
        self
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Check the preconditions the orchestrator relies on.
    pub fn validate(&self) -> Result<(), AiError> {
        if self.message.trim().is_empty() {
            return Err(AiError::invalid_input("Message must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Assembled Prompt
// ============================================================================

/// One entry of an assembled prompt.
///
/// Unlike [`ChatMessage`] a turn carries no content invariant, which keeps
/// prompt assembly total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTurn {
    pub role: ChatMessageRole,
    pub content: String,
}

impl PromptTurn {
    pub fn new(role: ChatMessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for PromptTurn {
    fn from(msg: &ChatMessage) -> Self {
        Self::new(msg.role(), msg.content())
    }
}

/// The ordered payload handed to a provider: template context, history,
/// then the new user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledPrompt {
    pub turns: Vec<PromptTurn>,
    /// True when a template was resolved, even if its content was empty.
    pub template_applied: bool,
}

impl AssembledPrompt {
    /// The new user message (always the last turn).
    pub fn final_turn(&self) -> Option<&PromptTurn> {
        self.turns.last()
    }

    /// Content of the leading system turn, if any.
    pub fn system_context(&self) -> Option<&str> {
        self.turns
            .first()
            .filter(|t| t.role == ChatMessageRole::System)
            .map(|t| t.content.as_str())
    }
}

// ============================================================================
// Provider Results
// ============================================================================

/// Classification of an ordinary provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderErrorKind {
    Auth,
    Quota,
    Timeout,
    MalformedResponse,
    Unknown,
}

impl ProviderErrorKind {
    /// Human-readable summary used when the gateway has nothing more specific.
    pub fn default_message(&self) -> &'static str {
        match self {
            ProviderErrorKind::Auth => "AI provider rejected the configured credentials",
            ProviderErrorKind::Quota => "AI provider quota or rate limit exceeded",
            ProviderErrorKind::Timeout => "AI provider did not respond in time",
            ProviderErrorKind::MalformedResponse => "AI provider returned a malformed response",
            ProviderErrorKind::Unknown => UNKNOWN_ERROR_MESSAGE,
        }
    }
}

/// Fallback message for failures without any detail.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// A typed provider failure. `message` is short and safe to show to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFailure {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(kind: ProviderErrorKind) -> Self {
        Self {
            kind,
            message: kind.default_message().to_string(),
        }
    }

    pub fn with_message(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The message to surface, never empty.
    pub fn display_message(&self) -> String {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.display_message())
    }
}

/// Raw successful provider reply.
///
/// Both fields are optional so a backend that parses loosely shaped
/// payloads can report what it actually received; the orchestrator decides
/// what a missing field means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderReply {
    pub text: Option<String>,
    pub model: Option<String>,
}

impl ProviderReply {
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            model: Some(model.into()),
        }
    }
}

// ============================================================================
// Outcome Envelope
// ============================================================================

/// Failure classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatErrorKind {
    ServiceUnavailable,
    ProviderAuthFailure,
    ProviderQuotaExceeded,
    ProviderTimeout,
    ProviderMalformedResponse,
    ProviderError,
    Internal,
}

impl ChatErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ChatErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ChatErrorKind::ProviderAuthFailure => "PROVIDER_AUTH_FAILURE",
            ChatErrorKind::ProviderQuotaExceeded => "PROVIDER_QUOTA_EXCEEDED",
            ChatErrorKind::ProviderTimeout => "PROVIDER_TIMEOUT",
            ChatErrorKind::ProviderMalformedResponse => "PROVIDER_MALFORMED_RESPONSE",
            ChatErrorKind::ProviderError => "PROVIDER_ERROR",
            ChatErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ChatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<ProviderErrorKind> for ChatErrorKind {
    fn from(kind: ProviderErrorKind) -> Self {
        match kind {
            ProviderErrorKind::Auth => ChatErrorKind::ProviderAuthFailure,
            ProviderErrorKind::Quota => ChatErrorKind::ProviderQuotaExceeded,
            ProviderErrorKind::Timeout => ChatErrorKind::ProviderTimeout,
            ProviderErrorKind::MalformedResponse => ChatErrorKind::ProviderMalformedResponse,
            ProviderErrorKind::Unknown => ChatErrorKind::ProviderError,
        }
    }
}

/// Message for [`ChatErrorKind::ServiceUnavailable`].
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "AI services not available - check API key configuration";

/// Message for [`ChatErrorKind::Internal`]. Deliberately carries no detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "Chat request failed";

/// Result of every chat call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ChatOutcome {
    #[serde(rename_all = "camelCase")]
    Success {
        response_text: String,
        model_used: String,
        processing_time_ms: u64,
    },
    #[serde(rename_all = "camelCase")]
    Failure {
        error_message: String,
        error_kind: ChatErrorKind,
    },
}

impl ChatOutcome {
    pub fn failure(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let error_message = if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        ChatOutcome::Failure {
            error_message,
            error_kind: kind,
        }
    }

    pub fn service_unavailable() -> Self {
        Self::failure(ChatErrorKind::ServiceUnavailable, SERVICE_UNAVAILABLE_MESSAGE)
    }

    pub fn internal() -> Self {
        Self::failure(ChatErrorKind::Internal, INTERNAL_ERROR_MESSAGE)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ChatOutcome::Success { .. })
    }

    pub fn error_kind(&self) -> Option<ChatErrorKind> {
        match self {
            ChatOutcome::Success { .. } => None,
            ChatOutcome::Failure { error_kind, .. } => Some(*error_kind),
        }
    }
}

impl From<ProviderFailure> for ChatOutcome {
    fn from(failure: ProviderFailure) -> Self {
        ChatOutcome::failure(failure.kind.into(), failure.display_message())
    }
}

// ============================================================================
// Tests
// ============================================================================
