//! Errors synthesized by the proxy route

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::{ErrorBody, BACKEND_UNREACHABLE_MESSAGE, METHOD_NOT_ALLOWED_MESSAGE};

/// Failure reported to the caller of the proxy route
///
/// The display text is exactly the message sent to the caller. Underlying
/// causes stay behind `source()` and are only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("{}", METHOD_NOT_ALLOWED_MESSAGE)]
    MethodNotAllowed,

    #[error("{}", BACKEND_UNREACHABLE_MESSAGE)]
    BackendUnreachable(#[from] ForwardError),
}

/// Why a forward attempt did not produce a JSON answer
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("failed to read request body: {0}")]
    ReadBody(#[source] axum::Error),

    #[error("request body is not JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("backend request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("backend response is not JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::BackendUnreachable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody::new(self.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
