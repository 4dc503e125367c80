//! HTTP seam for pulling raw datasets.
//!
//! [`HttpClient`] keeps the network behind a trait so downloads can be
//! exercised against an in-memory client.

use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;

/// Status and body of a completed GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// [`HttpClient`] backed by `reqwest`.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let resp = self.0.get(url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

/// Fetches `url` and returns the body, failing on any non-2xx status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let resp = client.get(url).await?;
    if !(200..300).contains(&resp.status) {
        let snippet = String::from_utf8_lossy(&resp.body[..resp.body.len().min(200)]).into_owned();
        bail!("GET {} returned status {}: {}", url, resp.status, snippet);
    }
    Ok(resp.body)
}
