//! rig-core backed provider gateway.
//!
//! Maps an assembled prompt onto a rig agent (preamble + chat history +
//! prompt), bounds the call with a timeout and classifies whatever the
//! provider SDK reports into a [`ProviderFailure`].

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client as HttpClient;
use rig::{
    client::{CompletionClient, Nothing},
    completion::{Chat, Message},
    message::{AssistantContent, Text, UserContent},
    providers::{anthropic, gemini, groq, ollama, openai},
    OneOrMany,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use crate::env::DEFAULT_PROVIDER_TIMEOUT;
use crate::error::AiError;
use crate::providers::ProviderGateway;
use crate::types::{
    AssembledPrompt, ChatMessageRole, ProviderErrorKind, ProviderFailure, ProviderReply,
    UNKNOWN_ERROR_MESSAGE,
};

/// Max characters of raw provider detail kept in an unknown failure.
pub const MAX_DETAIL_CHARS: usize = 200;

/// Anthropic requires max_tokens on every request.
const ANTHROPIC_MAX_TOKENS: u64 = 8096;

/// Supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
    Groq,
    Ollama,
}

impl ProviderKind {
    /// Cloud backends need an API key, local ones a base URL.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }
}

impl FromStr for ProviderKind {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "groq" => Ok(ProviderKind::Groq),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(AiError::UnknownProvider(other.to_string())),
        }
    }
}

// ============================================================================
// Prompt Mapping
// ============================================================================

/// A prompt split the way rig agents expect it.
#[derive(Debug, Clone)]
pub(crate) struct RigRequest {
    pub preamble: Option<String>,
    pub history: Vec<Message>,
    pub prompt: Message,
}

impl RigRequest {
    /// Leading system turns become the preamble. System turns after that
    /// are sent as user turns prefixed with `System: `. The last turn is
    /// the prompt.
    pub fn from_prompt(prompt: &AssembledPrompt) -> Result<Self, AiError> {
        let leading_system = prompt
            .turns
            .iter()
            .take_while(|t| t.role == ChatMessageRole::System)
            .count();

        let preamble = (leading_system > 0).then(|| {
            prompt.turns[..leading_system]
                .iter()
                .map(|t| t.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        });

        let mut messages: Vec<Message> = prompt.turns[leading_system..]
            .iter()
            .map(|turn| match turn.role {
                ChatMessageRole::User => user_message(turn.content.clone()),
                ChatMessageRole::Assistant => assistant_message(turn.content.clone()),
                ChatMessageRole::System => user_message(format!("System: {}", turn.content)),
            })
            .collect();

        let prompt = messages
            .pop()
            .ok_or_else(|| AiError::internal("Assembled prompt has no message turn"))?;

        Ok(Self {
            preamble,
            history: messages,
            prompt,
        })
    }
}

fn user_message(text: String) -> Message {
    Message::User {
        content: OneOrMany::one(UserContent::Text(Text { text })),
    }
}

fn assistant_message(text: String) -> Message {
    Message::Assistant {
        id: None,
        content: OneOrMany::one(AssistantContent::Text(Text { text })),
    }
}

// ============================================================================
// Error Classification
// ============================================================================

/// HTTP status codes standing alone, so ids and token counts never match.
static AUTH_STATUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(401|403)\b").expect("valid auth status regex"));
static QUOTA_STATUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b429\b").expect("valid quota status regex"));

/// Classify a provider error message.
pub fn classify_provider_error(raw: &str) -> ProviderFailure {
    let lower = raw.to_lowercase();
    let mentions = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    let kind = if AUTH_STATUS.is_match(&lower)
        || mentions(&[
            "unauthorized",
            "forbidden",
            "invalid api key",
            "invalid_api_key",
            "incorrect api key",
            "authentication",
        ])
    {
        ProviderErrorKind::Auth
    } else if QUOTA_STATUS.is_match(&lower)
        || mentions(&[
            "rate limit",
            "rate_limit",
            "too many requests",
            "quota",
            "insufficient credits",
            "insufficient balance",
        ])
    {
        ProviderErrorKind::Quota
    } else if mentions(&["timed out", "timeout", "deadline exceeded"]) {
        ProviderErrorKind::Timeout
    } else if mentions(&[
        "json",
        "deserializ",
        "decode",
        "unexpected response",
        "missing field",
        "invalid type",
    ]) {
        ProviderErrorKind::MalformedResponse
    } else {
        ProviderErrorKind::Unknown
    };

    match kind {
        ProviderErrorKind::Unknown => {
            ProviderFailure::with_message(kind, summarize_detail(raw, MAX_DETAIL_CHARS))
        }
        _ => ProviderFailure::new(kind),
    }
}

/// Collapse a raw message to one line of at most `max_chars` characters.
pub fn summarize_detail(raw: &str, max_chars: usize) -> String {
    let single_line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.is_empty() {
        return UNKNOWN_ERROR_MESSAGE.to_string();
    }
    if single_line.chars().count() <= max_chars {
        return single_line;
    }

    let keep = max_chars.saturating_sub(3);
    let mut cut: String = single_line.chars().take(keep).collect();
    if let Some(space) = cut.rfind(' ') {
        if space > keep / 2 {
            cut.truncate(space);
        }
    }
    format!("{}...", cut.trim_end())
}

/// Await `fut`, failing with a timeout failure after `limit`.
pub(crate) async fn bounded<F, T>(limit: Duration, fut: F) -> Result<T, AiError>
where
    F: Future<Output = Result<T, AiError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProviderFailure::new(ProviderErrorKind::Timeout).into()),
    }
}

// ============================================================================
// Rig Provider
// ============================================================================

/// Gateway backed by a rig-core client.
#[derive(Clone)]
pub struct RigProvider {
    id: String,
    kind: ProviderKind,
    model: String,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
}

impl RigProvider {
    pub fn new(id: &str, kind: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            kind,
            model: model.into(),
            api_key: None,
            base_url: None,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> Result<&str, AiError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AiError::MissingApiKey(self.id.clone()))
    }

    async fn call(&self, request: RigRequest) -> Result<String, AiError> {
        let model = self.model.as_str();
        let RigRequest {
            preamble,
            history,
            prompt,
        } = request;

        macro_rules! chat_with {
            ($client:expr, $max_tokens:expr) => {{
                let mut builder = $client.agent(model);
                if let Some(preamble) = preamble.as_deref() {
                    builder = builder.preamble(preamble);
                }
                if let Some(tokens) = $max_tokens {
                    builder = builder.max_tokens(tokens);
                }
                builder
                    .build()
                    .chat(prompt, history)
                    .await
                    .map_err(|e| AiError::Provider(classify_provider_error(&e.to_string())))
            }};
        }

        match self.kind {
            ProviderKind::Anthropic => {
                let client: anthropic::Client<HttpClient> =
                    anthropic::Client::new(self.api_key()?).map_err(client_error)?;
                chat_with!(client, Some(ANTHROPIC_MAX_TOKENS))
            }
            ProviderKind::Gemini => {
                let client: gemini::Client<HttpClient> =
                    gemini::Client::new(self.api_key()?).map_err(client_error)?;
                chat_with!(client, None::<u64>)
            }
            ProviderKind::Groq => {
                let client: groq::Client<HttpClient> =
                    groq::Client::new(self.api_key()?).map_err(client_error)?;
                chat_with!(client, None::<u64>)
            }
            ProviderKind::OpenAi => {
                // Completions API rather than Responses API.
                let client: openai::CompletionsClient<HttpClient> =
                    openai::CompletionsClient::builder()
                        .api_key(self.api_key()?)
                        .build()
                        .map_err(client_error)?;
                chat_with!(client, None::<u64>)
            }
            ProviderKind::Ollama => {
                let mut builder = ollama::Client::<HttpClient>::builder().api_key(Nothing);
                if let Some(url) = self.base_url.as_deref() {
                    builder = builder.base_url(url);
                }
                let client = builder.build().map_err(client_error)?;
                chat_with!(client, None::<u64>)
            }
        }
    }
}

fn client_error(e: impl std::fmt::Display) -> AiError {
    AiError::internal(format!("Failed to create provider client: {}", e))
}

#[async_trait]
impl ProviderGateway for RigProvider {
    fn provider_id(&self) -> &str {
        &self.id
    }

    fn is_available(&self) -> bool {
        if self.kind.requires_api_key() {
            self.api_key.is_some()
        } else {
            self.base_url.is_some()
        }
    }

    async fn generate(&self, prompt: &AssembledPrompt) -> Result<ProviderReply, AiError> {
        let request = RigRequest::from_prompt(prompt)?;
        debug!(
            "Calling provider {} model {} with {} history turns",
            self.id,
            self.model,
            request.history.len()
        );

        let text = bounded(self.timeout, self.call(request)).await?;
        Ok(ProviderReply {
            text: Some(text),
            model: Some(self.model.clone()),
        })
    }
}
