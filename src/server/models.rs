//! Model catalog and negotiation endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::AppState;
use crate::config::types::ChatConfig;
use crate::error::ApiError;
use crate::models::validator::UNKNOWN_MODEL_WARNING;
use crate::models::{AiModel, EffectiveSettings, RequestedSettings, ValidationResult};

/// Negotiation input. Omitted toggles fall back to the configured chat defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiateRequest {
    pub model_id: Option<String>,
    pub web_search_enabled: Option<bool>,
    pub reasoning_enabled: Option<bool>,
    pub has_image_attachments: Option<bool>,
    pub has_document_attachments: Option<bool>,
}

impl NegotiateRequest {
    pub(crate) fn resolve(self, defaults: &ChatConfig) -> (String, RequestedSettings) {
        let model_id = self
            .model_id
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| defaults.default_model.clone());
        let requested = RequestedSettings {
            web_search_enabled: self.web_search_enabled.unwrap_or(defaults.web_search_enabled),
            reasoning_enabled: self.reasoning_enabled.unwrap_or(defaults.reasoning_enabled),
            has_image_attachments: self.has_image_attachments.unwrap_or(false),
            has_document_attachments: self.has_document_attachments.unwrap_or(false),
        };
        (model_id, requested)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiateResponse {
    pub model_id: String,
    pub requested: RequestedSettings,
    pub validation: ValidationResult,
    pub effective: EffectiveSettings,
}

/// GET /api/models
pub async fn list_models(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "models": state.registry.models(),
        "defaultModel": state.settings.chat.default_model,
    }))
}

/// GET /api/models/{id}
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AiModel>, ApiError> {
    state
        .registry
        .get_model_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(UNKNOWN_MODEL_WARNING.into()))
}

/// POST /api/models/negotiate
///
/// Reports both the advisory validation and the settings that will actually
/// be honored, so the client can show warnings and send the right flags.
pub async fn negotiate(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<NegotiateResponse>, ApiError> {
    let body = body?;
    let req: NegotiateRequest = if body.is_empty() {
        NegotiateRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(error = %e, "rejecting negotiate request");
            ApiError::BadRequest("Invalid JSON body".into())
        })?
    };

    let (model_id, requested) = req.resolve(&state.settings.chat);
    let validation = state.registry.validate_model_settings(&model_id, &requested);
    let effective = state.registry.get_effective_settings(&model_id, &requested);

    if !validation.is_valid {
        tracing::debug!(
            model_id = %model_id,
            warnings = validation.warnings.len(),
            "requested settings downgraded"
        );
    }

    Ok(Json(NegotiateResponse {
        model_id,
        requested,
        validation,
        effective,
    }))
}
