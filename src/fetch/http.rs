//! Blocking HTTP transport backed by `ureq`.

use crate::fetch::{Transport, TransportResponse};
use anyhow::{Context, Result};
use std::time::Duration;
use ureq::Agent;
use ureq::http::header::CONTENT_TYPE;

/// Fetches over HTTP(S). Non-2xx answers are returned as responses, not errors.
pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    /// Build a transport; `timeout` bounds each whole request when set.
    pub fn new(timeout: Option<Duration>) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .with_context(|| format!("GET {url}"))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .body_mut()
            .read_to_vec()
            .with_context(|| format!("reading body of {url}"))?;
        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}
