//! Request handler for the prediction route

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::error::{ForwardError, ProxyError};
use super::server::ProxyState;

/// Largest inbound body the proxy will read
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Prediction request handler
pub struct ProxyHandler {
    state: ProxyState,
}

impl ProxyHandler {
    pub fn new(state: ProxyState) -> Self {
        Self { state }
    }

    /// Handle an incoming request
    ///
    /// Always produces a JSON response: the backend's body with status 200, or
    /// a synthesized `{"error": ...}` body.
    pub async fn handle(&self, req: Request<Body>) -> Response {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        tracing::debug!(method = %method, path = %path, "Processing prediction request");

        match self.predict(req).await {
            Ok(json) => (StatusCode::OK, Json(json)).into_response(),
            Err(ProxyError::MethodNotAllowed) => {
                tracing::debug!(method = %method, path = %path, "Rejected non-POST request");
                ProxyError::MethodNotAllowed.into_response()
            }
            Err(ProxyError::BackendUnreachable(cause)) => {
                tracing::warn!(
                    error = %cause,
                    backend = %self.state.config.backend.base_url(),
                    "Prediction forward failed"
                );
                ProxyError::BackendUnreachable(cause).into_response()
            }
        }
    }

    async fn predict(&self, req: Request<Body>) -> Result<serde_json::Value, ProxyError> {
        if req.method() != Method::POST {
            return Err(ProxyError::MethodNotAllowed);
        }

        let body_bytes = to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(ForwardError::ReadBody)?;
        let payload = Self::parse_inbound(&body_bytes)?;

        Ok(self.forward(&payload).await?)
    }

    /// Parse the inbound body; an empty body is forwarded as JSON `null`
    fn parse_inbound(body: &[u8]) -> Result<serde_json::Value, ForwardError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(body).map_err(ForwardError::InvalidBody)
    }

    /// Issue the single outbound call and decode the backend's JSON answer
    async fn forward(&self, payload: &serde_json::Value) -> Result<serde_json::Value, ForwardError> {
        let backend_url = self.state.config.backend.predict_url();
        let body = serde_json::to_vec(payload).map_err(ForwardError::InvalidBody)?;

        tracing::debug!(backend_url = %backend_url, body_size = body.len(), "Forwarding to backend");

        let backend_response = self
            .state
            .http_client
            .post(&backend_url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(ForwardError::Transport)?;

        // The backend status is not relayed; a JSON error body still goes out as 200.
        let status = backend_response.status();
        if !status.is_success() {
            tracing::debug!(status = %status, "Backend returned non-success status, relaying body");
        }

        let body_bytes = backend_response
            .bytes()
            .await
            .map_err(ForwardError::Transport)?;

        serde_json::from_slice(&body_bytes).map_err(|e| {
            tracing::debug!(
                body_preview = %String::from_utf8_lossy(&body_bytes[..body_bytes.len().min(200)]),
                "Backend body is not JSON"
            );
            ForwardError::Decode(e)
        })
    }
}
