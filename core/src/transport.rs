//! Executes `HttpRequest` values against the network.
//!
//! `UreqTransport` drives a blocking `ureq` agent on tokio's blocking pool.
//! Status codes are returned as data rather than errors so that
//! `TodoClient::parse_*` stays the single place where statuses are
//! interpreted.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking `ureq` agent run through `tokio::task::spawn_blocking`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        let method = request.method;
        let path = request.path.clone();

        let response = tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))??;

        tracing::debug!(%method, %path, status = response.status, "http round-trip");
        Ok(response)
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn execute_blocking(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let body = req.body.unwrap_or_default();
    let result = match req.method {
        HttpMethod::Get => with_headers(agent.get(&req.path), &req.headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(&req.path), &req.headers).call(),
        HttpMethod::Post => with_headers(agent.post(&req.path), &req.headers).send(body.as_bytes()),
        HttpMethod::Put => with_headers(agent.put(&req.path), &req.headers).send(body.as_bytes()),
    };
    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
