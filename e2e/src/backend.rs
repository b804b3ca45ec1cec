//! Mock prediction backend
//!
//! Serves POST /predict from a queue of pre-configured responses and records
//! every request it receives. GET / answers like a healthy backend root.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::types::{BackendState, MockResponse, ReceivedRequest, SharedBackendState};

/// Served when a test did not queue anything
fn default_prediction_response() -> MockResponse {
    MockResponse::json(r#"{"prediction":{"label":"POSITIVE","score":0.5}}"#)
}

async fn handle_predict(State(state): State<SharedBackendState>, headers: HeaderMap, body: Bytes) -> Response {
    let received = ReceivedRequest {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        raw_body: String::from_utf8_lossy(&body).into_owned(),
    };

    let mock_response = {
        let mut state = state.lock().unwrap();
        state.received_requests.push(received);
        state.response_queue.pop_front().unwrap_or_else(default_prediction_response)
    };

    Response::builder()
        .status(mock_response.status)
        .header(header::CONTENT_TYPE, &mock_response.content_type)
        .body(Body::from(mock_response.body))
        .unwrap()
}

async fn handle_root() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"message":"MLOps Template Running"}"#,
    )
}

/// Start the mock backend server and return the shared state handle
pub async fn start(port: u16) -> anyhow::Result<SharedBackendState> {
    let state: SharedBackendState = std::sync::Arc::new(std::sync::Mutex::new(BackendState::default()));

    let app = Router::new()
        .route("/", get(handle_root))
        .route("/predict", post(handle_predict))
        .with_state(state.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind mock backend to {}: {}", addr, e))?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend server failed");
    });

    // Brief pause to let the server start accepting connections
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    Ok(state)
}

/// Queue the response for the next POST /predict
pub fn queue_response(state: &SharedBackendState, response: MockResponse) {
    state.lock().unwrap().response_queue.push_back(response);
}

/// Take all requests received since the last drain
pub fn drain_requests(state: &SharedBackendState) -> Vec<ReceivedRequest> {
    let mut s = state.lock().unwrap();
    s.received_requests.drain(..).collect()
}
