//! HTTP client the view uses to reach the proxy

use async_trait::async_trait;

use crate::api::PredictionRequest;

/// Anything that can answer a prediction request on behalf of the view
#[async_trait]
pub trait PredictClient: Send + Sync {
    /// Send one request and return the parsed JSON answer.
    ///
    /// The HTTP status is not inspected; only transport and decode failures
    /// are errors.
    async fn predict(&self, request: &PredictionRequest) -> Result<serde_json::Value, ClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("proxy request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("proxy response is not JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Calls the proxy's prediction route over HTTP
pub struct HttpPredictClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpPredictClient {
    /// `endpoint` is the full URL of the proxy route, e.g. `http://127.0.0.1:3000/api/predict`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PredictClient for HttpPredictClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<serde_json::Value, ClientError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        tracing::debug!(status = %resp.status(), endpoint = %self.endpoint, "Proxy answered");

        resp.json::<serde_json::Value>().await.map_err(ClientError::Decode)
    }
}
