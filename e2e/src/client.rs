//! HTTP client that talks to the proxy the way a browser page would

use reqwest::{Client, Method};

use crate::types::ProxyResponse;

/// Build an HTTP client
pub fn build_client() -> Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build reqwest client")
}

/// Send `method` to a proxy path with a raw body and parse the JSON answer
pub async fn send(
    client: &Client,
    proxy_addr: &str,
    method: Method,
    path: &str,
    raw_body: Option<String>,
) -> anyhow::Result<ProxyResponse> {
    let url = format!("http://{proxy_addr}{path}");

    let mut req = client.request(method.clone(), &url);
    if let Some(body) = raw_body {
        req = req.header("Content-Type", "application/json").body(body);
    }

    let resp = req
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send {} {}: {}", method, url, e))?;

    let status = resp.status().as_u16();
    let body_text = resp
        .text()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read proxy response: {}", e))?;

    let body: serde_json::Value = serde_json::from_str(&body_text).map_err(|e| {
        anyhow::anyhow!(
            "Proxy response is not valid JSON: {}: {}",
            e,
            &body_text[..body_text.len().min(500)]
        )
    })?;

    Ok(ProxyResponse {
        status,
        body,
        raw: body_text,
    })
}

/// POST a JSON value to the proxy's /api/predict route
pub async fn predict(client: &Client, proxy_addr: &str, body: &serde_json::Value) -> anyhow::Result<ProxyResponse> {
    send(client, proxy_addr, Method::POST, "/api/predict", Some(body.to_string())).await
}
