//! Plain-text rendering of the client view

use super::ClientView;
use crate::api::PredictionSummary;

pub const TITLE: &str = "FastAPI MLOps Text Classification";

const PLACEHOLDER: &str = "Enter text to classify...";

/// Render the view as plain text
pub fn render(view: &ClientView) -> String {
    let mut out = String::new();

    out.push_str(TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(TITLE.len()));
    out.push_str("\n\n");

    if view.input().is_empty() {
        out.push_str(&format!("> ({})\n\n", PLACEHOLDER));
    } else {
        for line in view.input().lines() {
            out.push_str(&format!("> {}\n", line));
        }
        out.push('\n');
    }

    let button = if view.is_busy() { "Predicting..." } else { "Predict" };
    if view.can_submit() || view.is_busy() {
        out.push_str(&format!("[ {} ]\n", button));
    } else {
        out.push_str(&format!("[ {} ] (disabled)\n", button));
    }

    if let Some(result) = view.result() {
        out.push_str("\nResult:\n");
        let pretty = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
        out.push_str(&pretty);
        out.push('\n');

        if let Some(summary) = PredictionSummary::from_value(result) {
            out.push_str(&format!("Prediction: {}\n", summary));
        }
    }

    out
}
