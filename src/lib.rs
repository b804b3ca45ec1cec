//! predict-proxy: same-origin proxy for a JSON prediction backend
//!
//! Features:
//! - `/predict` and `/api/predict` forwarded to `<backend>/predict`
//! - Fixed-shape JSON errors for non-POST requests and unreachable backends
//! - A terminal client view that submits text and renders the JSON result

pub mod api;
pub mod config;
pub mod proxy;
pub mod view;

pub use config::AppConfig;
pub use proxy::run_server;
