//! predict-proxy e2e suite
//!
//! Starts a mock prediction backend, launches the real proxy binary with
//! `FASTAPI_URL` pointing at that backend, runs every scenario against it,
//! then stops the proxy.
//!
//!   cargo run                      # run all scenarios
//!   cargo run -- --list            # print scenario names
//!   cargo run -- --filter relay/   # run a subset

mod backend;
mod client;
mod runner;
mod tests;
mod types;

use clap::Parser;
use colored::Colorize;
use runner::{list_tests, run_tests, TestContext};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tests::all_tests;
use tokio::process::{Child, Command};

/// Proxy binary candidates, tried in order
const PROXY_BIN_CANDIDATES: &[&str] = &["../target/release/predict-proxy", "../target/debug/predict-proxy"];

/// The proxy takes its backend from here, so the suite exercises the env path
const BACKEND_URL_ENV: &str = "FASTAPI_URL";

#[derive(Parser)]
#[command(name = "e2e", about = "End-to-end tests for predict-proxy")]
struct Cli {
    /// Print the scenario names and exit
    #[arg(long)]
    list: bool,

    /// Only run scenarios whose name contains this string
    #[arg(long, short)]
    filter: Option<String>,

    /// predict-proxy binary (defaults to the release, then debug, build)
    #[arg(long)]
    proxy_bin: Option<PathBuf>,

    /// Port for the mock backend
    #[arg(long, default_value_t = 18080)]
    backend_port: u16,

    /// Port the proxy is told to listen on
    #[arg(long, default_value_t = 18066)]
    proxy_port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list {
        list_tests(&all_tests());
        return Ok(());
    }

    let proxy_bin = match cli.proxy_bin {
        Some(path) => path,
        None => find_proxy_bin()?,
    };

    let backend_state = backend::start(cli.backend_port).await?;
    let backend_url = format!("http://127.0.0.1:{}", cli.backend_port);
    println!("Mock backend running at {}", backend_url.bright_cyan());

    let mut proxy = spawn_proxy(&proxy_bin, &backend_url, cli.proxy_port)?;

    let proxy_addr = format!("127.0.0.1:{}", cli.proxy_port);
    wait_for_proxy(&proxy_addr).await?;
    println!("Proxy ready at {}", proxy_addr.bright_cyan());

    let ctx = TestContext {
        proxy_addr,
        backend_state,
        http_client: client::build_client(),
    };
    let results = run_tests(all_tests(), ctx, cli.filter.as_deref()).await;

    proxy.kill().await.ok();

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

/// Launch `predict-proxy run` listening on loopback, with the backend given only through the environment
fn spawn_proxy(bin: &Path, backend_url: &str, port: u16) -> anyhow::Result<Child> {
    println!(
        "Spawning {} run --port {} with {}={}",
        bin.display(),
        port,
        BACKEND_URL_ENV,
        backend_url
    );

    Command::new(bin)
        .args(["run", "--host", "127.0.0.1", "--port", &port.to_string()])
        .env(BACKEND_URL_ENV, backend_url)
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| anyhow::anyhow!("Failed to spawn '{}': {}", bin.display(), e))
}

fn find_proxy_bin() -> anyhow::Result<PathBuf> {
    PROXY_BIN_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No proxy binary found (tried {}). Build it with: cd .. && cargo build --release",
                PROXY_BIN_CANDIDATES.join(", ")
            )
        })
}

/// Poll /health until the proxy answers or about six seconds pass
async fn wait_for_proxy(addr: &str) -> anyhow::Result<()> {
    let client = client::build_client();
    let health_url = format!("http://{}/health", addr);

    for _ in 0..30 {
        if client.get(&health_url).send().await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    Err(anyhow::anyhow!("Proxy did not answer on {} in time", health_url))
}
