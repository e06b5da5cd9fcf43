//! Provider catalog, gateway trait and registry.
//!
//! This module provides:
//! - Provider catalog loaded from embedded JSON
//! - The `ProviderGateway` trait every backend implements
//! - `ProviderRegistry`, which picks the configured default gateway
//! - `StubProvider`, a scripted gateway with no network access

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::env::AiEnvironment;
use crate::error::AiError;
use crate::rig_provider::{ProviderKind, RigProvider};
use crate::types::{AssembledPrompt, ProviderFailure, ProviderReply};

// ============================================================================
// Provider Catalog (Static JSON)
// ============================================================================

/// Static provider catalog loaded from embedded JSON.
static PROVIDER_CATALOG: Lazy<CatalogFile> = Lazy::new(|| {
    let json = include_str!("ai_providers.json");
    serde_json::from_str(json).expect("Failed to parse ai_providers.json")
});

#[derive(Debug, Deserialize)]
struct CatalogFile {
    providers: HashMap<String, CatalogEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    name: String,
    #[serde(rename = "type")]
    provider_type: String,
    #[serde(default)]
    env_key: Option<String>,
    default_model: String,
    #[serde(default)]
    default_url: Option<String>,
}

/// Catalog view of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub provider_type: String,
    pub env_key: Option<String>,
    pub default_model: String,
    pub default_url: Option<String>,
}

/// Read-only access to the embedded catalog.
pub struct ProviderCatalog;

impl ProviderCatalog {
    pub fn get(provider_id: &str) -> Option<ProviderInfo> {
        PROVIDER_CATALOG
            .providers
            .get(provider_id)
            .map(|entry| to_info(provider_id, entry))
    }

    /// All providers, sorted by id.
    pub fn list() -> Vec<ProviderInfo> {
        let mut providers: Vec<ProviderInfo> = PROVIDER_CATALOG
            .providers
            .iter()
            .map(|(id, entry)| to_info(id, entry))
            .collect();
        providers.sort_by(|a, b| a.id.cmp(&b.id));
        providers
    }
}

fn to_info(id: &str, entry: &CatalogEntry) -> ProviderInfo {
    ProviderInfo {
        id: id.to_string(),
        name: entry.name.clone(),
        provider_type: entry.provider_type.clone(),
        env_key: entry.env_key.clone(),
        default_model: entry.default_model.clone(),
        default_url: entry.default_url.clone(),
    }
}

// ============================================================================
// Provider Gateway Trait
// ============================================================================

/// A text-generation backend.
///
/// `generate` reports ordinary provider failures as
/// `AiError::Provider`. Any other error is a fault.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Get the provider ID.
    fn provider_id(&self) -> &str;

    /// Whether the backend is configured well enough to be called.
    fn is_available(&self) -> bool;

    /// Generate a reply for an assembled prompt.
    async fn generate(&self, prompt: &AssembledPrompt) -> Result<ProviderReply, AiError>;
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Registry of provider gateways with an optional default.
///
/// The registry is itself a gateway that forwards to its default, so the
/// orchestrator never needs to know which backend is configured.
#[derive(Default)]
pub struct ProviderRegistry {
    gateways: HashMap<String, Arc<dyn ProviderGateway>>,
    default_id: Option<String>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one gateway per catalog entry, configured from the environment.
    pub fn from_environment(env: &dyn AiEnvironment) -> Result<Self, AiError> {
        let default_id = env.default_provider().filter(|id| !id.trim().is_empty());
        let timeout = env.provider_timeout();
        let mut registry = Self::new();

        for info in ProviderCatalog::list() {
            let kind: ProviderKind = match info.id.parse() {
                Ok(kind) => kind,
                Err(_) => {
                    log::warn!("Skipping catalog provider without a backend: {}", info.id);
                    continue;
                }
            };

            let model = if default_id.as_deref() == Some(info.id.as_str()) {
                env.default_model()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| info.default_model.clone())
            } else {
                info.default_model.clone()
            };

            let api_key = info.env_key.as_deref().and_then(|key| env.get_secret(key));
            let base_url = env.provider_url(&info.id).or_else(|| info.default_url.clone());

            let provider = RigProvider::new(&info.id, kind, model)
                .with_api_key(api_key)
                .with_base_url(base_url)
                .with_timeout(timeout);
            registry.register(Arc::new(provider));
        }

        if let Some(id) = default_id {
            registry.set_default(&id)?;
        }

        log::info!(
            "AI provider registry ready (default: {}, available: {})",
            registry.default_id.as_deref().unwrap_or("none"),
            registry.is_available()
        );

        Ok(registry)
    }

    /// Register a provider gateway.
    pub fn register(&mut self, gateway: Arc<dyn ProviderGateway>) {
        self.gateways
            .insert(gateway.provider_id().to_string(), gateway);
    }

    /// Select the default gateway. The id must already be registered.
    pub fn set_default(&mut self, provider_id: &str) -> Result<(), AiError> {
        if !self.gateways.contains_key(provider_id) {
            return Err(AiError::UnknownProvider(provider_id.to_string()));
        }
        self.default_id = Some(provider_id.to_string());
        Ok(())
    }

    /// Get a provider gateway by ID.
    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn ProviderGateway>> {
        self.gateways.get(provider_id).cloned()
    }

    /// Get the default provider gateway.
    pub fn get_default(&self) -> Option<Arc<dyn ProviderGateway>> {
        self.default_id.as_deref().and_then(|id| self.get(id))
    }

    /// List all registered provider IDs, sorted.
    pub fn list_providers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.gateways.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl ProviderGateway for ProviderRegistry {
    fn provider_id(&self) -> &str {
        self.default_id.as_deref().unwrap_or("")
    }

    fn is_available(&self) -> bool {
        self.get_default()
            .map(|gateway| gateway.is_available())
            .unwrap_or(false)
    }

    async fn generate(&self, prompt: &AssembledPrompt) -> Result<ProviderReply, AiError> {
        let gateway = self
            .get_default()
            .ok_or_else(|| AiError::internal("No default AI provider configured"))?;
        gateway.generate(prompt).await
    }
}

// ============================================================================
// Stub Provider
// ============================================================================

/// What a [`StubProvider`] answers with.
#[derive(Debug, Clone)]
pub enum StubResponse {
    Reply(ProviderReply),
    Failure(ProviderFailure),
    Fault(AiError),
}

/// A scripted gateway that never touches the network.
pub struct StubProvider {
    id: String,
    available: bool,
    response: StubResponse,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<AssembledPrompt>>,
}

impl StubProvider {
    pub fn new(id: &str, response: StubResponse) -> Self {
        Self {
            id: id.to_string(),
            available: true,
            response,
            delay: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// A stub that always replies with `text` from `model`.
    pub fn replying(id: &str, text: &str, model: &str) -> Self {
        Self::new(id, StubResponse::Reply(ProviderReply::new(text, model)))
    }

    /// A stub that always fails with `failure`.
    pub fn failing(id: &str, failure: ProviderFailure) -> Self {
        Self::new(id, StubResponse::Failure(failure))
    }

    /// Mark the stub as not configured.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The prompt seen by the most recent `generate` call.
    pub fn last_prompt(&self) -> Option<AssembledPrompt> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl ProviderGateway for StubProvider {
    fn provider_id(&self) -> &str {
        &self.id
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, prompt: &AssembledPrompt) -> Result<ProviderReply, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.response {
            StubResponse::Reply(reply) => Ok(reply.clone()),
            StubResponse::Failure(failure) => Err(AiError::Provider(failure.clone())),
            StubResponse::Fault(err) => Err(err.clone()),
        }
    }
}
