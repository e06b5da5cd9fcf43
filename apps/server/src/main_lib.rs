use std::sync::Arc;

use crate::{
    ai_environment::ServerAiEnvironment, auth::AuthManager, chat_events::TracingChatEvents,
    config::Config,
};
use quill_ai::{ChatOrchestrator, ProviderGateway, ProviderRegistry, TemplateResolver};
use quill_storage_sqlite::{db, DbPool, PromptTemplateRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub orchestrator: ChatOrchestrator,
    /// Kept alongside the orchestrator for the provider listing endpoint.
    pub registry: Arc<ProviderRegistry>,
    pub templates: Arc<PromptTemplateRepository>,
    pub pool: Arc<DbPool>,
    pub auth: Option<Arc<AuthManager>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("QUILL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let environment = ServerAiEnvironment::new(config);
    let registry = ProviderRegistry::from_environment(&environment)?;
    build_state_with_registry(config, registry).await
}

/// Assemble the application state around an already configured registry.
pub async fn build_state_with_registry(
    config: &Config,
    registry: ProviderRegistry,
) -> anyhow::Result<Arc<AppState>> {
    let (pool, writer) = db::open(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let templates = Arc::new(PromptTemplateRepository::new(pool.clone(), writer));

    let registry = Arc::new(registry);
    match registry.get_default() {
        Some(gateway) if gateway.is_available() => {
            tracing::info!("AI provider in use: {}", gateway.provider_id());
        }
        Some(gateway) => {
            tracing::warn!(
                "AI provider {} is not configured; chat requests will be rejected",
                gateway.provider_id()
            );
        }
        None => tracing::warn!("No AI provider selected; chat requests will be rejected"),
    }

    let orchestrator = ChatOrchestrator::new(
        registry.clone(),
        TemplateResolver::new(templates.clone()),
    )
    .with_event_sink(Arc::new(TracingChatEvents));

    let auth = match &config.auth {
        Some(auth_config) => Some(Arc::new(AuthManager::new(auth_config)?)),
        None => {
            tracing::warn!("QUILL_JWT_SECRET is not set; all protected routes will return 401");
            None
        }
    };

    Ok(Arc::new(AppState {
        orchestrator,
        registry,
        templates,
        pool,
        auth,
    }))
}
