//! Test runner - executes tests and reports results

use colored::Colorize;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use crate::types::{SharedBackendState, TestResult};

type TestFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A single test case
pub struct TestCase {
    pub name: &'static str,
    pub description: &'static str,
    pub run: Box<dyn Fn(TestContext) -> TestFuture + Send + Sync>,
}

/// Context passed to each test - proxy address and mock backend handle
#[derive(Clone)]
pub struct TestContext {
    pub proxy_addr: String,
    pub backend_state: SharedBackendState,
    pub http_client: reqwest::Client,
}

impl TestContext {
    /// Forget queued responses and recorded requests from earlier tests
    fn reset_backend(&self) {
        let mut state = self.backend_state.lock().unwrap();
        state.response_queue.clear();
        state.received_requests.clear();
    }
}

/// Run the selected test cases sequentially and report results
pub async fn run_tests(cases: Vec<TestCase>, ctx: TestContext, filter: Option<&str>) -> Vec<TestResult> {
    let selected: Vec<&TestCase> = cases
        .iter()
        .filter(|c| filter.map_or(true, |f| c.name.contains(f)))
        .collect();

    println!("\n{}", "═══════════════════════════════════════════════════".bright_blue());
    println!("{}", "  predict-proxy End-to-End Tests".bright_white().bold());
    println!("{}", "═══════════════════════════════════════════════════".bright_blue());
    println!("  Proxy:   {}", ctx.proxy_addr.bright_cyan());
    println!("  Running: {} test(s)\n", selected.len().to_string().bright_cyan());

    let mut results = Vec::with_capacity(selected.len());

    for case in selected {
        ctx.reset_backend();

        print!("  {} {} ... ", "▶".bright_blue(), case.name.bright_white());
        let start = Instant::now();
        let outcome = (case.run)(ctx.clone()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &outcome {
            Ok(()) => println!("{} ({duration_ms}ms)", "PASS".bright_green().bold()),
            Err(e) => {
                println!("{} ({duration_ms}ms)", "FAIL".bright_red().bold());
                println!("    {} {}", "Error:".bright_red(), e);
                for cause in e.chain().skip(1) {
                    println!("    {} {}", "Caused by:".yellow(), cause);
                }
            }
        }

        results.push(TestResult {
            name: case.name.to_string(),
            passed: outcome.is_ok(),
            error: outcome.err().map(|e| e.to_string()),
            duration_ms,
        });
    }

    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    println!("\n{}", "───────────────────────────────────────────────────".bright_blue());
    let summary = format!("  Results: {} passed, {} failed", passed, failed);
    if failed == 0 {
        println!("{}", summary.bright_green().bold());
    } else {
        println!("{}", summary.bright_red().bold());
    }
    println!("{}\n", "═══════════════════════════════════════════════════".bright_blue());

    results
}

/// Print all available tests
pub fn list_tests(cases: &[TestCase]) {
    println!("\n{}", "Available tests:".bright_white().bold());
    for case in cases {
        println!("  {} - {}", case.name.bright_cyan(), case.description);
    }
    println!();
}
