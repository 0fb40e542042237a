use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid model registry: {0}")]
    InvalidRegistry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<figment::Error> for GatewayError {
    fn from(err: figment::Error) -> Self {
        GatewayError::Config(Box::new(err))
    }
}

/// Error returned to HTTP callers as `{"error": "..."}`.
///
/// Messages are caller-facing; internal details are logged by the handler,
/// never rendered here.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A required upstream secret is missing from the environment.
    #[error("{0} API key not configured")]
    NotConfigured(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Request body could not be buffered, e.g. it exceeds `server.body_limit_bytes`.
    #[error("{}", .0.body_text())]
    Body(#[from] BytesRejection),

    /// Non-success upstream status, relayed to the caller.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// Catch-all for unexpected failures; carries a generic message only.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Body(rejection) => rejection.status(),
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
