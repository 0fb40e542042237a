//! Search-contents proxy: POST /api/exa/contents

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::response::{IntoResponse, Response};

use super::{AppState, relay_status, upstream_url};
use crate::error::ApiError;

const VENDOR: &str = "Exa";
const FAILURE: &str = "Failed to fetch from Exa API";

/// Forward the request body untouched to Exa's `/contents` endpoint.
pub async fn handle_contents(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let cfg = &state.settings.exa;
    if cfg.key.is_empty() {
        tracing::error!("Exa API key is not configured");
        return Err(ApiError::NotConfigured(VENDOR));
    }
    let body = body?;

    let url = upstream_url(&cfg.base_url, &["contents"]).map_err(|e| {
        tracing::error!(error = %e, base_url = %cfg.base_url, "invalid Exa base URL");
        ApiError::Internal(FAILURE)
    })?;

    tracing::info!(bytes = body.len(), "forwarding Exa contents request");

    let resp = state
        .http
        .post(url)
        .header("x-api-key", &cfg.key)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Exa request failed");
            ApiError::Internal(FAILURE)
        })?;

    let status = resp.status();
    if !status.is_success() {
        let body_text = resp.text().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read Exa error body");
            String::new()
        });
        tracing::warn!(status = %status, body = %body_text, "Exa API returned an error");
        return Err(ApiError::Upstream {
            status: relay_status(status),
            message: body_text,
        });
    }

    let data: serde_json::Value = resp.json().await.map_err(|e| {
        tracing::error!(error = %e, "failed to parse Exa response");
        ApiError::Internal(FAILURE)
    })?;

    Ok(Json(data).into_response())
}
