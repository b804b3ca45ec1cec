//! Common test helpers and JSON builders

use serde_json::{json, Value};

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const BACKEND_UNREACHABLE: &str = "Failed to connect to FastAPI backend";

/// Request body the browser page sends
pub fn text_request(text: &str) -> Value {
    json!({ "text": text })
}

/// Classification answer as the backend service produces it
pub fn classification_response(label: &str, score: f64) -> String {
    json!({
        "prediction": {
            "label": label,
            "score": score
        }
    })
    .to_string()
}

/// Assert that a proxy body is exactly `{"error": <message>}`
pub fn assert_error_body(body: &Value, message: &str) -> anyhow::Result<()> {
    let expected = json!({ "error": message });
    if *body != expected {
        Err(anyhow::anyhow!("Expected error body {} but got {}", expected, body))
    } else {
        Ok(())
    }
}

/// Assert two values are equal, with context on failure
pub fn assert_eq_json(actual: &Value, expected: &Value, label: &str) -> anyhow::Result<()> {
    if actual != expected {
        Err(anyhow::anyhow!("{label}: expected {} but got {}", expected, actual))
    } else {
        Ok(())
    }
}

/// Assert condition is true, with message
pub fn assert_true(cond: bool, msg: &str) -> anyhow::Result<()> {
    if !cond {
        Err(anyhow::anyhow!("{}", msg))
    } else {
        Ok(())
    }
}
