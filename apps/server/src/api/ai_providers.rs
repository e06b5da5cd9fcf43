use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{extract::State, routing::get, Json, Router};
use quill_ai::{ProviderCatalog, ProviderGateway};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub default_model: String,
    pub available: bool,
    pub is_default: bool,
}

/// Catalog providers with their configuration state. Never exposes secrets.
async fn get_ai_providers(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ProviderSummary>>> {
    let default_id = state
        .registry
        .get_default()
        .map(|gateway| gateway.provider_id().to_string());

    let providers = ProviderCatalog::list()
        .into_iter()
        .map(|info| {
            let available = state
                .registry
                .get(&info.id)
                .map(|gateway| gateway.is_available())
                .unwrap_or(false);
            ProviderSummary {
                is_default: default_id.as_deref() == Some(info.id.as_str()),
                available,
                id: info.id,
                name: info.name,
                provider_type: info.provider_type,
                default_model: info.default_model,
            }
        })
        .collect();
    Ok(Json(providers))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ai/providers", get(get_ai_providers))
}
