//! predict-proxy: same-origin proxy for a JSON prediction backend
//!
//! Sits between a client and a prediction service and provides:
//! - A `/predict` route forwarding JSON bodies to `<backend>/predict`
//! - Fixed-shape JSON errors when the backend cannot be reached
//! - A terminal client view for submitting text by hand

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

use predict_proxy::{
    api::{PredictionRequest, PredictionSummary},
    config::{backend_url_from_env, AppConfig, CliOverrides, ConfigError, BACKEND_URL_ENV},
    proxy::server::build_http_client,
    run_server,
    view::{run_terminal, HttpPredictClient},
};

#[derive(Parser)]
#[command(name = "predict-proxy")]
#[command(version = "0.1.0")]
#[command(about = "Same-origin proxy for a JSON prediction backend")]
#[command(long_about = "
predict-proxy forwards prediction requests to a backend service:
  - POST /predict and /api/predict are relayed to <backend>/predict
  - Backend failures become {\"error\": \"Failed to connect to FastAPI backend\"}
  - The backend URL comes from the config file or FASTAPI_URL (default http://127.0.0.1:8000)

Example usage:
  predict-proxy run --port 3000
  FASTAPI_URL=http://models:8000 predict-proxy run
  predict-proxy ui --proxy-url http://127.0.0.1:3000/api/predict
")]
struct Cli {
    /// Path to config file (optional; config.yaml is used when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the proxy server
    Run {
        /// Override listen host
        #[arg(long)]
        host: Option<String>,
        /// Override listen port
        #[arg(short, long)]
        port: Option<u16>,
        /// Override backend URL (e.g., "http://127.0.0.1:8000")
        #[arg(long)]
        backend_url: Option<String>,
    },

    /// Interactive terminal client: each line of input is sent for prediction
    Ui {
        /// Full URL of the proxy route (defaults to the configured listen address)
        #[arg(long)]
        proxy_url: Option<String>,
    },

    /// Validate configuration
    CheckConfig,

    /// Test connection to the backend prediction service
    TestBackend,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    // Logs go to stderr so the terminal view owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            host,
            port,
            backend_url,
        } => {
            let overrides = CliOverrides {
                host,
                port,
                backend_url,
            };
            run_proxy(cli.config.as_deref(), overrides).await?;
        }
        Commands::Ui { proxy_url } => {
            run_ui(cli.config.as_deref(), proxy_url).await?;
        }
        Commands::CheckConfig => {
            check_config(cli.config.as_deref());
        }
        Commands::TestBackend => {
            test_backend(cli.config.as_deref()).await?;
        }
    }

    Ok(())
}

/// Run the proxy server
async fn run_proxy(config_path: Option<&Path>, overrides: CliOverrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::resolve_with(config_path, &overrides) {
        Ok(config) => config,
        Err(e) => exit_config_error(e),
    };

    tracing::info!(backend = %config.backend.base_url(), "Configuration resolved");

    run_server(config).await
}

/// Run the terminal client view against a running proxy
async fn run_ui(config_path: Option<&Path>, proxy_url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let proxy_url = match proxy_url {
        Some(url) => url,
        None => {
            let config = load_config_or_exit(config_path);
            let host = match config.server.host.as_str() {
                "0.0.0.0" | "::" => "127.0.0.1",
                other => other,
            };
            format!("http://{}:{}/api/predict", host, config.server.port)
        }
    };

    let client = HttpPredictClient::new(proxy_url);
    eprintln!("Sending predictions to {}", client.endpoint());
    eprintln!("Type text and press Enter to predict. :q or Ctrl-D to quit.\n");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run_terminal(&client, stdin, tokio::io::stdout()).await?;

    Ok(())
}

/// Validate configuration
fn check_config(config_path: Option<&Path>) {
    match AppConfig::resolve(config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid\n");
            println!("Server:");
            println!("  Listen: {}:{}", config.server.host, config.server.port);
            println!("\nBackend:");
            println!("  URL: {}", config.backend.base_url());
            println!("  Predict: {}", config.backend.predict_url());
            if backend_url_from_env().is_some() {
                println!("  (from {})", BACKEND_URL_ENV);
            }
            println!("  TLS: {}", if config.backend.is_tls() { "enabled" } else { "disabled" });
            if let Some(ref tls) = config.backend.tls {
                if tls.accept_invalid_certs {
                    println!("  TLS: Accepting invalid certificates");
                }
                if let Some(ref ca) = tls.ca_cert_path {
                    println!("  TLS CA: {}", ca);
                }
            }
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Test connection to the backend
async fn test_backend(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_or_exit(config_path);
    let client = build_http_client(&config.backend)?;
    let root_url = format!("{}/", config.backend.base_url());

    println!("Testing connection to backend: {}", root_url);

    match tokio::time::timeout(Duration::from_secs(5), client.get(&root_url).send()).await {
        Ok(Ok(resp)) => {
            println!("✓ Backend is reachable");
            println!("  Status: {}", resp.status());
            if let Ok(body) = resp.text().await {
                let message = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_string));
                match message {
                    Some(message) => println!("  Message: {}", message),
                    None => println!("  Response: {}", body.trim()),
                }
            }
        }
        Ok(Err(e)) => {
            println!("✗ Failed to connect to backend: {}", e);
            std::process::exit(1);
        }
        Err(_) => {
            println!("✗ Backend did not answer within 5s");
            std::process::exit(1);
        }
    }

    let predict_url = config.backend.predict_url();
    println!("\nTesting /predict endpoint: {}", predict_url);

    let probe = PredictionRequest {
        text: "predict-proxy connectivity check".to_string(),
    };
    match tokio::time::timeout(Duration::from_secs(30), client.post(&predict_url).json(&probe).send()).await {
        Ok(Ok(resp)) => {
            let status = resp.status();
            match resp.json::<serde_json::Value>().await {
                Ok(json) => {
                    println!("✓ /predict answered with JSON ({})", status);
                    if let Some(summary) = PredictionSummary::from_value(&json) {
                        println!("  Prediction: {}", summary);
                    } else {
                        println!("  Response: {}", json);
                    }
                }
                Err(e) => println!("  /predict returned {} with a non-JSON body: {}", status, e),
            }
        }
        Ok(Err(e)) => println!("  /predict error: {}", e),
        Err(_) => println!("  /predict did not answer within 30s"),
    }

    Ok(())
}

/// Load configuration or exit with error
fn load_config_or_exit(config_path: Option<&Path>) -> AppConfig {
    match AppConfig::resolve(config_path) {
        Ok(config) => config,
        Err(e) => exit_config_error(e),
    }
}

fn exit_config_error(e: ConfigError) -> ! {
    eprintln!("Error loading configuration: {}", e);
    eprintln!("\nThe config file is optional; without one the backend defaults to");
    eprintln!("{} unless {} is set.", predict_proxy::config::DEFAULT_BACKEND_URL, BACKEND_URL_ENV);
    std::process::exit(1);
}
