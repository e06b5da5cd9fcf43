//! Server implementation of the chat core's environment.

use std::time::Duration;

use quill_ai::AiEnvironment;

use crate::config::{non_empty_var, Config};

/// Reads provider selection from [`Config`] and secrets from process env vars.
pub struct ServerAiEnvironment {
    provider: Option<String>,
    model: Option<String>,
    timeout: Duration,
}

impl ServerAiEnvironment {
    pub fn new(config: &Config) -> Self {
        Self {
            provider: config.ai_provider.clone(),
            model: config.ai_model.clone(),
            timeout: config.ai_timeout,
        }
    }
}

impl AiEnvironment for ServerAiEnvironment {
    fn get_secret(&self, key: &str) -> Option<String> {
        non_empty_var(key)
    }

    fn default_provider(&self) -> Option<String> {
        self.provider.clone()
    }

    fn default_model(&self) -> Option<String> {
        self.model.clone()
    }

    fn provider_url(&self, provider_id: &str) -> Option<String> {
        non_empty_var(&format!("QUILL_{}_URL", provider_id.to_uppercase()))
    }

    fn provider_timeout(&self) -> Duration {
        self.timeout
    }
}
