//! Prediction request/response payloads

use serde::{Deserialize, Serialize};

/// Body of a synthesized proxy error for a non-POST request
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

/// Body of a synthesized proxy error for any forwarding failure
pub const BACKEND_UNREACHABLE_MESSAGE: &str = "Failed to connect to FastAPI backend";

/// Result stored by the client view when the proxy cannot be reached
pub const CLIENT_UNREACHABLE_MESSAGE: &str = "Failed to connect to API";

/// Request body the client view sends to the proxy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PredictionRequest {
    pub text: String,
}

/// Fixed-shape error payload: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.error })
    }
}

/// Label/score pair returned by a text-classification backend
///
/// Backends conventionally answer `{"prediction": {"label": "...", "score": 0.99}}`.
/// Nothing in the proxy depends on this shape; the view uses it for a summary line.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictionSummary {
    pub label: String,
    #[serde(default)]
    pub score: Option<f64>,
}

impl PredictionSummary {
    /// Extract a summary from a result value, if it has the classification shape
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let prediction = value.get("prediction")?;
        serde_json::from_value(prediction.clone()).ok()
    }
}

impl std::fmt::Display for PredictionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.score {
            Some(score) => write!(f, "{} ({:.4})", self.label, score),
            None => write!(f, "{}", self.label),
        }
    }
}
