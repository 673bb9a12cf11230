//! Serves a local site directory as if it were deployed under a base path.
//!
//! Useful for staging a built site (or a source checkout) without a web
//! server. Requests are confined to the site root: anything that escapes it,
//! directly or through symlinks, answers 404 like a missing file.

use crate::fetch::{Transport, TransportResponse};
use crate::paths::has_scheme;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Directory-backed transport mounted at a URL prefix.
#[derive(Debug, Clone)]
pub struct DirectoryTransport {
    root: PathBuf,
    mount: String,
}

impl DirectoryTransport {
    /// Serve `root` under `mount` (for example `/portfolio/`).
    pub fn new(root: impl Into<PathBuf>, mount: &str) -> Self {
        let trimmed = mount.trim_matches('/');
        let mount = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        Self {
            root: root.into(),
            mount,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a resolved URL onto a file below the root, if it stays inside.
    fn locate(&self, url: &str) -> Result<Option<PathBuf>> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let relative = if let Some(stripped) = path.strip_prefix(&self.mount) {
            stripped
        } else if path.starts_with('/') {
            if path.trim_end_matches('/') == self.mount.trim_end_matches('/') {
                ""
            } else {
                return Ok(None);
            }
        } else {
            path
        };

        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Ok(None);
        }

        let candidate = self.root.join(relative);
        if !candidate.is_file() {
            return Ok(None);
        }

        let root = fs::canonicalize(&self.root)
            .with_context(|| format!("canonicalizing site root {}", self.root.display()))?;
        let canonical = fs::canonicalize(&candidate)
            .with_context(|| format!("canonicalizing {}", candidate.display()))?;
        if !canonical.starts_with(&root) {
            return Ok(None);
        }
        Ok(Some(canonical))
    }
}

impl Transport for DirectoryTransport {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        if has_scheme(url) {
            bail!("directory transport cannot fetch remote URL {url}");
        }
        let Some(path) = self.locate(url)? else {
            return Ok(TransportResponse::new(404, Some("text/plain"), "not found"));
        };
        let body = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(TransportResponse::new(200, Some(content_type_for(&path)), body))
    }
}

/// Content type a static host would send for `path`.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "json" => "application/json",
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "txt" | "md" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        _ => "application/octet-stream",
    }
}
