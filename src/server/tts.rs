//! Text-to-speech proxy: POST /api/elevenlabs/tts
//!
//! Forwards synthesis requests to ElevenLabs with the server-held API key.
//! Single upstream call per request, no retries.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{StatusCode, header};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::{AppState, relay_status, upstream_url};
use crate::error::ApiError;

const VENDOR: &str = "ElevenLabs";
const FAILURE: &str = "Failed to generate speech";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
        }
    }
}

/// Body accepted from the browser.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TtsRequest {
    voice_id: Option<String>,
    text: Option<String>,
    model_id: Option<String>,
    voice_settings: Option<VoiceSettings>,
    with_timestamps: Option<bool>,
}

/// Body sent to ElevenLabs.
#[derive(Debug, Serialize)]
struct UpstreamRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

pub async fn handle_tts(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let cfg = &state.settings.elevenlabs;
    if cfg.key.is_empty() {
        tracing::error!("ElevenLabs API key is not configured");
        return Err(ApiError::NotConfigured(VENDOR));
    }
    let body = body?;

    let req: TtsRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = %e, "failed to parse TTS request body");
        ApiError::Internal(FAILURE)
    })?;

    let (Some(voice_id), Some(text)) = (
        req.voice_id.filter(|v| !v.is_empty()),
        req.text.filter(|t| !t.is_empty()),
    ) else {
        tracing::debug!("TTS request missing voiceId or text");
        return Err(ApiError::BadRequest(
            "Missing required fields: voiceId and text".into(),
        ));
    };

    let with_timestamps = req.with_timestamps.unwrap_or(false);
    let mut segments = vec!["v1", "text-to-speech", voice_id.as_str()];
    if with_timestamps {
        segments.push("with-timestamps");
    }
    let mut url = upstream_url(&cfg.base_url, &segments).map_err(|e| {
        tracing::error!(error = %e, base_url = %cfg.base_url, "invalid ElevenLabs base URL");
        ApiError::Internal(FAILURE)
    })?;
    url.query_pairs_mut()
        .append_pair("output_format", &cfg.output_format);

    let model_id = req
        .model_id
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| cfg.default_model_id.clone());
    let payload = UpstreamRequest {
        text: &text,
        model_id: &model_id,
        voice_settings: req.voice_settings.unwrap_or_default(),
    };

    tracing::info!(
        voice_id = %voice_id,
        model_id = %model_id,
        chars = text.chars().count(),
        with_timestamps,
        "forwarding TTS request"
    );

    let accept = if with_timestamps {
        "application/json"
    } else {
        "audio/mpeg"
    };
    let resp = state
        .http
        .post(url)
        .header("xi-api-key", &cfg.key)
        .header(reqwest::header::ACCEPT, accept)
        .json(&payload)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "ElevenLabs request failed");
            ApiError::Internal(FAILURE)
        })?;

    let status = resp.status();
    if !status.is_success() {
        let body_text = resp.text().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read ElevenLabs error body");
            String::new()
        });
        tracing::warn!(status = %status, body = %body_text, "ElevenLabs API returned an error");
        return Err(match status.as_u16() {
            401 => ApiError::Upstream {
                status: StatusCode::UNAUTHORIZED,
                message: "Invalid ElevenLabs API key".into(),
            },
            429 => ApiError::Upstream {
                status: StatusCode::TOO_MANY_REQUESTS,
                message: "Rate limit exceeded. Try again later.".into(),
            },
            _ => ApiError::Upstream {
                status: relay_status(status),
                message: body_text,
            },
        });
    }

    let bytes = resp.bytes().await.map_err(|e| {
        tracing::error!(error = %e, "failed to read ElevenLabs response body");
        ApiError::Internal(FAILURE)
    })?;

    let builder = if with_timestamps {
        // Audio plus alignment data; relayed as-is.
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
    } else {
        // Output is request-specific; keep it out of every cache.
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "audio/mpeg")
            .header(header::CONTENT_LENGTH, bytes.len())
            .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(header::PRAGMA, "no-cache")
            .header(header::EXPIRES, "0")
    };

    builder.body(Body::from(bytes)).map_err(|e| {
        tracing::error!(error = %e, "failed to build TTS response");
        ApiError::Internal(FAILURE)
    })
}
