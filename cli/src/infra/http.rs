//! Infrastructure implementation of the `PoolTransport` port over `reqwest`.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Method;
use serde_json::Value;

use crate::application::ports::{AUTH_TOKEN_HEADER, HttpMethod, PoolRequest, PoolTransport};

/// Production transport: one shared `reqwest::Client` with a per-request
/// timeout.
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("vmlease/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, timeout })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

impl PoolTransport for ReqwestTransport {
    async fn send(&self, request: PoolRequest) -> Result<Value> {
        let PoolRequest {
            method: verb,
            url,
            token,
            body,
        } = request;

        let mut builder = self
            .client
            .request(method(verb), url.clone())
            .timeout(self.timeout);
        if let Some(token) = token {
            builder = builder.header(AUTH_TOKEN_HEADER, token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("{verb} {url} failed"))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("reading response of {verb} {url}"))?;
        parse_body(&text).with_context(|| format!("{verb} {url} returned {status}"))
    }
}

/// The pool answers with JSON even on error statuses; an empty body is `null`.
fn parse_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).context("response body is not JSON")
}
