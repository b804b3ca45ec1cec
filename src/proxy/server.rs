//! Proxy server setup

use axum::{
    extract::State,
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handler::ProxyHandler;
use crate::config::{AppConfig, BackendConfig};

/// Shared state for the proxy
///
/// Immutable after startup; every request gets a clone.
#[derive(Clone)]
pub struct ProxyState {
    pub config: Arc<AppConfig>,
    pub http_client: reqwest::Client,
}

impl ProxyState {
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let http_client = build_http_client(&config.backend)?;
        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }
}

/// Build the backend HTTP client with TLS configuration
///
/// No request timeout is set: a forward runs until the backend answers or the
/// transport fails.
pub fn build_http_client(backend: &BackendConfig) -> Result<reqwest::Client, Box<dyn std::error::Error>> {
    let mut client_builder = reqwest::Client::builder().pool_max_idle_per_host(10);

    if let Some(ref tls) = backend.tls {
        if tls.accept_invalid_certs {
            client_builder = client_builder.danger_accept_invalid_certs(true);
            tracing::warn!("TLS: Accepting invalid certificates (use only for development/testing)");
        }

        if let Some(ref ca_path) = tls.ca_cert_path {
            let ca_cert = std::fs::read(ca_path)?;
            let ca_cert = reqwest::Certificate::from_pem(&ca_cert)?;
            client_builder = client_builder.add_root_certificate(ca_cert);
            tracing::info!("TLS: Loaded custom CA certificate from {}", ca_path);
        }
    }

    Ok(client_builder.build()?)
}

/// Build the router: the prediction route under both paths plus a local health check
pub fn build_router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/predict", any(predict_handler))
        .route("/api/predict", any(predict_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the proxy server
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let backend_url = config.backend.base_url().to_string();

    let state = ProxyState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("predict-proxy listening on {}", addr);
    tracing::info!("Proxying /predict and /api/predict to {}/predict", backend_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("predict-proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

/// Health check endpoint, answered locally
async fn health_handler() -> &'static str {
    "OK"
}

async fn predict_handler(State(state): State<ProxyState>, req: axum::extract::Request) -> axum::response::Response {
    let handler = ProxyHandler::new(state);
    handler.handle(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TlsConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_is_local() {
        // Backend is unreachable; /health must not depend on it
        let mut config = AppConfig::default();
        config.backend.url = "http://127.0.0.1:1".to_string();
        let app = build_router(ProxyState::new(config).unwrap());

        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_proxied() {
        let app = build_router(ProxyState::new(AppConfig::default()).unwrap());

        let resp = app
            .oneshot(Request::builder().uri("/v1/other").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_build_http_client_missing_ca() {
        let backend = BackendConfig {
            url: "https://models.example.com".to_string(),
            tls: Some(TlsConfig {
                accept_invalid_certs: false,
                ca_cert_path: Some("/nonexistent/ca.pem".to_string()),
            }),
        };
        assert!(build_http_client(&backend).is_err());
    }

    #[test]
    fn test_build_http_client_accept_invalid() {
        let backend = BackendConfig {
            url: "https://localhost:8443".to_string(),
            tls: Some(TlsConfig {
                accept_invalid_certs: true,
                ca_cert_path: None,
            }),
        };
        assert!(build_http_client(&backend).is_ok());
    }
}
