//! Environment abstraction for the chat core.
//!
//! This module provides the `AiEnvironment` trait that abstracts runtime
//! configuration like API keys, the selected provider and the provider
//! call timeout. The server implements this trait over its own config.

use std::time::Duration;

/// Default bound on a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment abstraction for provider setup.
///
/// Implementations provide access to:
/// - Secrets (API keys), looked up by the catalog `envKey`
/// - The configured default provider and model
/// - Base URL overrides for local providers
pub trait AiEnvironment: Send + Sync {
    /// Get a secret by key (e.g. `OPENAI_API_KEY`). Empty values count as absent.
    fn get_secret(&self, key: &str) -> Option<String>;

    /// Provider id selected for chat, if any.
    fn default_provider(&self) -> Option<String>;

    /// Model override for the default provider.
    fn default_model(&self) -> Option<String>;

    /// Base URL override for a provider.
    fn provider_url(&self, provider_id: &str) -> Option<String>;

    /// Upper bound for one provider call.
    fn provider_timeout(&self) -> Duration {
        DEFAULT_PROVIDER_TIMEOUT
    }
}

#[cfg(test)]
pub mod test_env {
    use super::*;
    use std::collections::HashMap;

    /// Mock environment for testing.
    #[derive(Default, Clone)]
    pub struct MockEnvironment {
        pub secrets: HashMap<String, String>,
        pub provider: Option<String>,
        pub model: Option<String>,
        pub urls: HashMap<String, String>,
        pub timeout: Option<Duration>,
    }

    impl MockEnvironment {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_secret(mut self, key: &str, value: &str) -> Self {
            self.secrets.insert(key.to_string(), value.to_string());
            self
        }

        pub fn with_provider(mut self, provider: &str) -> Self {
            self.provider = Some(provider.to_string());
            self
        }

        pub fn with_model(mut self, model: &str) -> Self {
            self.model = Some(model.to_string());
            self
        }

        pub fn with_url(mut self, provider: &str, url: &str) -> Self {
            self.urls.insert(provider.to_string(), url.to_string());
            self
        }
    }

    impl AiEnvironment for MockEnvironment {
        fn get_secret(&self, key: &str) -> Option<String> {
            self.secrets.get(key).filter(|v| !v.is_empty()).cloned()
        }

        fn default_provider(&self) -> Option<String> {
            self.provider.clone()
        }

        fn default_model(&self) -> Option<String> {
            self.model.clone()
        }

        fn provider_url(&self, provider_id: &str) -> Option<String> {
            self.urls.get(provider_id).cloned()
        }

        fn provider_timeout(&self) -> Duration {
            self.timeout.unwrap_or(DEFAULT_PROVIDER_TIMEOUT)
        }
    }
}
