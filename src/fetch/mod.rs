//! JSON fetching over a pluggable transport.
//!
//! A [`Transport`] performs one GET for an already-resolved URL and reports
//! the raw outcome. [`JsonFetcher`] layers path resolution, status and
//! content-type checks, and parsing on top, and turns every failure into
//! `None` after logging it. Callers default missing documents to empty values
//! instead of branching on error kinds.

pub mod file;
pub mod http;

pub use file::DirectoryTransport;
pub use http::HttpTransport;

use crate::paths::PathResolver;
use anyhow::Result;
use log::{debug, error, warn};
use serde_json::Value;

/// Raw outcome of a single GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the network (or filesystem) side of a fetch.
///
/// `Err` means the request never produced a response; any response, whatever
/// its status, is `Ok`.
pub trait Transport {
    fn get(&self, url: &str) -> Result<TransportResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        (**self).get(url)
    }
}

/// True when a `Content-Type` value names a JSON payload.
///
/// Accepts `application/json` and any `+json` structured suffix, ignoring
/// parameters and case.
pub fn is_json_content_type(content_type: &str) -> bool {
    let media = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media == "application/json" || (media.starts_with("application/") && media.ends_with("+json"))
}

/// Resolves, fetches and parses JSON documents, yielding `None` on failure.
pub struct JsonFetcher<T> {
    resolver: PathResolver,
    transport: T,
}

impl<T: Transport> JsonFetcher<T> {
    pub fn new(resolver: PathResolver, transport: T) -> Self {
        Self {
            resolver,
            transport,
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Load the JSON document at `path`.
    ///
    /// Transport errors, non-2xx statuses, non-JSON content types and
    /// malformed bodies are all logged and reported as `None`.
    pub fn load_json(&self, path: &str) -> Option<Value> {
        let url = self.resolver.resolve(path);
        debug!("fetching {url}");

        let response = match self.transport.get(&url) {
            Ok(response) => response,
            Err(err) => {
                error!("failed to load JSON from {url}: {err:#}");
                return None;
            }
        };

        if !response.is_success() {
            warn!("failed to load JSON from {url}: status {}", response.status);
            return None;
        }

        let content_type = response.content_type.as_deref().unwrap_or_default();
        if !is_json_content_type(content_type) {
            warn!("failed to load JSON from {url}: unexpected content type {content_type:?}");
            return None;
        }

        match serde_json::from_slice(&response.body) {
            Ok(value) => Some(value),
            Err(err) => {
                error!("failed to load JSON from {url}: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    /// Scripted transport keyed by resolved URL; unknown URLs answer 404.
    #[derive(Default)]
    pub struct ScriptedTransport {
        routes: BTreeMap<String, Option<TransportResponse>>,
        pub requests: RefCell<Vec<String>>,
    }

    impl ScriptedTransport {
        pub fn json(mut self, url: &str, body: Value) -> Self {
            let response =
                TransportResponse::new(200, Some("application/json"), body.to_string());
            self.routes.insert(url.to_string(), Some(response));
            self
        }

        pub fn respond(mut self, url: &str, response: TransportResponse) -> Self {
            self.routes.insert(url.to_string(), Some(response));
            self
        }

        pub fn fail(mut self, url: &str) -> Self {
            self.routes.insert(url.to_string(), None);
            self
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, url: &str) -> Result<TransportResponse> {
            self.requests.borrow_mut().push(url.to_string());
            match self.routes.get(url) {
                Some(Some(response)) => Ok(response.clone()),
                Some(None) => Err(anyhow!("connection refused")),
                None => Ok(TransportResponse::new(404, Some("text/html"), "not found")),
            }
        }
    }
}
