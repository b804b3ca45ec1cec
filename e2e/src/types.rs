//! Shared types for the e2e test framework

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A response the mock backend serves for the next POST /predict
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub content_type: String,
}

impl MockResponse {
    /// 200 with a JSON body
    pub fn json(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    /// Arbitrary status with a JSON content type
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "application/json".to_string(),
        }
    }

    /// Non-JSON body, as an upstream gateway error page would be
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "text/html".to_string(),
        }
    }
}

/// Shared state for the mock backend server
#[derive(Debug, Default)]
pub struct BackendState {
    /// Tests push responses, the backend pops and serves them
    pub response_queue: VecDeque<MockResponse>,
    /// Every POST /predict the backend received
    pub received_requests: Vec<ReceivedRequest>,
}

/// A request received by the mock backend
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub content_type: Option<String>,
    /// Raw body text as it arrived on the wire
    pub raw_body: String,
}

impl ReceivedRequest {
    pub fn json(&self) -> anyhow::Result<serde_json::Value> {
        serde_json::from_str(&self.raw_body)
            .map_err(|e| anyhow::anyhow!("Backend received non-JSON body: {}: {}", e, self.raw_body))
    }
}

pub type SharedBackendState = Arc<Mutex<BackendState>>;

/// Status and parsed JSON body of a proxy response
#[derive(Debug)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: serde_json::Value,
    /// Body text exactly as the proxy sent it
    pub raw: String,
}

/// Result of a single test case
#[derive(Debug)]
#[allow(dead_code)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
