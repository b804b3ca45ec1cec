//! Client view: text entry, one proxy call per submit, result display
//!
//! The view holds three values (input text, last result, busy flag) and moves
//! between two phases:
//!
//! ```text
//! Idle --submit(non-blank text)--> Submitting --response | failure--> Idle
//! ```
//!
//! Rendering is a pure function of those values; see [`render`].

mod client;
mod render;
mod terminal;

pub use client::{ClientError, HttpPredictClient, PredictClient};
pub use render::{render, TITLE};
pub use terminal::run_terminal;

use crate::api::{ErrorBody, PredictionRequest, CLIENT_UNREACHABLE_MESSAGE};

/// Phase of the view's interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

/// Transient state of one client view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientView {
    input: String,
    result: Option<serde_json::Value>,
    busy: bool,
}

impl ClientView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Last success or error payload, if any call has completed
    pub fn result(&self) -> Option<&serde_json::Value> {
        self.result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Submitting
        } else {
            Phase::Idle
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Submit is enabled only when idle and the input has non-whitespace text
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.input.trim().is_empty()
    }

    /// Enter `Submitting` and return the request to send.
    ///
    /// Returns `None` and leaves the state untouched when submit is disabled.
    /// The text is sent as typed, without trimming.
    pub fn begin_submit(&mut self) -> Option<PredictionRequest> {
        if !self.can_submit() {
            return None;
        }
        self.busy = true;
        Some(PredictionRequest {
            text: self.input.clone(),
        })
    }

    /// Record the outcome of the outstanding call and return to `Idle`
    pub fn complete(&mut self, outcome: Result<serde_json::Value, ClientError>) {
        if !self.busy {
            tracing::debug!("Ignoring completion with no call outstanding");
            return;
        }

        self.result = Some(match outcome {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Prediction call failed");
                ErrorBody::new(CLIENT_UNREACHABLE_MESSAGE).to_value()
            }
        });
        self.busy = false;
    }

    /// Run one full submit cycle against `client`.
    ///
    /// Returns false without calling the client when submit is disabled.
    pub async fn submit<C>(&mut self, client: &C) -> bool
    where
        C: PredictClient + ?Sized,
    {
        let Some(request) = self.begin_submit() else {
            return false;
        };
        let outcome = client.predict(&request).await;
        self.complete(outcome);
        true
    }

    pub fn render(&self) -> String {
        render(self)
    }
}
