mod loader;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use loader::load_config;

/// Environment variable holding the backend base URL
pub const BACKEND_URL_ENV: &str = "FASTAPI_URL";

/// Backend used when neither the config file nor the environment names one
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Command-line overrides, applied after the file and the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub backend_url: Option<String>,
}

/// Backend URL from [`BACKEND_URL_ENV`]; unset and blank both count as absent
pub fn backend_url_from_env() -> Option<String> {
    non_blank(std::env::var(BACKEND_URL_ENV).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Proxy server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Backend prediction service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the prediction service (e.g., "http://127.0.0.1:8000")
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// TLS configuration options
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

/// TLS configuration for backend connections
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Accept invalid certificates (self-signed, expired)
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Path to custom CA certificate (PEM format)
    pub ca_cert_path: Option<String>,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            tls: None,
        }
    }
}

impl BackendConfig {
    /// Returns the base URL with trailing slash stripped
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Full URL of the backend prediction route
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url())
    }

    /// Returns true if the URL uses HTTPS
    pub fn is_tls(&self) -> bool {
        self.url.to_lowercase().starts_with("https://")
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Resolve configuration once at startup, without command-line overrides.
    ///
    /// An explicit path must exist. Without one, the default locations are
    /// tried and built-in defaults are used when none exist.
    pub fn resolve(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(config_path, &CliOverrides::default())
    }

    /// Resolve configuration with command-line overrides on top of the file
    /// and the environment
    pub fn resolve_with(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::load_or_default()?,
        };
        config.layered(backend_url_from_env(), overrides)
    }

    /// Apply the environment backend URL, then command-line overrides, then
    /// validate the result once
    pub fn layered(mut self, env_backend_url: Option<String>, overrides: &CliOverrides) -> Result<Self, ConfigError> {
        self.apply_backend_override(env_backend_url);

        if let Some(ref host) = overrides.host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        self.apply_backend_override(overrides.backend_url.clone());

        self.validate()?;
        Ok(self)
    }

    /// Load from the first default location that exists, or fall back to defaults
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let default_paths = ["config.yaml", "config.yml", "./config/config.yaml"];
        for p in default_paths {
            let path = Path::new(p);
            if path.exists() {
                tracing::debug!(path = %path.display(), "Using configuration file");
                return Self::from_file(path);
            }
        }
        Ok(Self::default())
    }

    /// Replace the backend URL when an override is present and non-empty
    pub fn apply_backend_override(&mut self, url: Option<String>) {
        if let Some(url) = non_blank(url) {
            self.backend.url = url;
        }
    }

    /// Check that the backend URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(self.backend.base_url()).map_err(|e| {
            ConfigError::Validation(format!("invalid backend URL {:?}: {}", self.backend.url, e))
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "unsupported backend URL scheme {:?} (expected http or https)",
                other
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
