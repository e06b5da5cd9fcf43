//! Chat core error types.

use thiserror::Error;

use crate::types::ProviderFailure;

/// Errors raised inside the chat core.
///
/// `Provider` is the only variant that represents an ordinary, expected
/// failure. Every other variant reaching the orchestrator is treated as a
/// fault and reported to callers as an internal failure.
#[derive(Debug, Clone, Error)]
pub enum AiError {
    /// Invalid input or request.
    #[error("{0}")]
    InvalidInput(String),

    /// Missing API key for a provider.
    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),

    /// Provider id not present in the catalog.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Typed failure reported by a provider gateway.
    #[error("Provider error: {0}")]
    Provider(ProviderFailure),

    /// Template store could not be read.
    #[error("Template store error: {0}")]
    TemplateStore(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AiError {
    /// Create a new invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new template store error.
    pub fn template_store(msg: impl Into<String>) -> Self {
        Self::TemplateStore(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Error code for programmatic handling.
impl AiError {
    pub fn code(&self) -> &'static str {
        match self {
            AiError::InvalidInput(_) => "INVALID_INPUT",
            AiError::MissingApiKey(_) => "MISSING_API_KEY",
            AiError::UnknownProvider(_) => "UNKNOWN_PROVIDER",
            AiError::Provider(_) => "PROVIDER_ERROR",
            AiError::TemplateStore(_) => "TEMPLATE_STORE_ERROR",
            AiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ProviderFailure> for AiError {
    fn from(failure: ProviderFailure) -> Self {
        AiError::Provider(failure)
    }
}
