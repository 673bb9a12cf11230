//! Where the site lives and how to reach it.
//!
//! Settings come from the environment (`FOLIO_SITE`, `FOLIO_BASE_PATH`,
//! `FOLIO_TIMEOUT_SECS`) and are then overridden by CLI flags. Environment
//! access goes through a lookup closure so tests can feed values directly.

use crate::fetch::{DirectoryTransport, HttpTransport, JsonFetcher, Transport};
use crate::paths::PathResolver;
use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_SITE: &str = "FOLIO_SITE";
pub const ENV_BASE_PATH: &str = "FOLIO_BASE_PATH";
pub const ENV_TIMEOUT_SECS: &str = "FOLIO_TIMEOUT_SECS";

const DEFAULT_BASE_PATH: &str = "/";

/// A local site directory or a remote origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteLocation {
    Dir(PathBuf),
    Url(String),
}

impl SiteLocation {
    /// `http://` and `https://` values are origins; anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SiteLocation::Url(trimmed.to_string())
        } else {
            SiteLocation::Dir(PathBuf::from(trimmed))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub site: SiteLocation,
    /// Sub-path the site is served under, e.g. `/portfolio/`.
    pub base_path: String,
    /// Per-request bound for remote fetches; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteLocation::Dir(PathBuf::from(".")),
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout: None,
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(site) = lookup(ENV_SITE).filter(|v| !v.trim().is_empty()) {
            config.site = SiteLocation::parse(&site);
        }
        if let Some(base) = lookup(ENV_BASE_PATH) {
            config.base_path = base.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config
                .set_timeout_secs(&raw)
                .with_context(|| format!("invalid {ENV_TIMEOUT_SECS}"))?;
        }
        Ok(config)
    }

    /// Blank or `0` disables the timeout.
    pub fn set_timeout_secs(&mut self, raw: &str) -> Result<()> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "0" {
            self.timeout = None;
            return Ok(());
        }
        let Ok(secs) = raw.parse::<u64>() else {
            bail!("timeout must be a whole number of seconds, got {raw:?}");
        };
        self.timeout = Some(Duration::from_secs(secs));
        Ok(())
    }

    /// The base path rooted at `/`, so `portfolio` and `/portfolio/` serve
    /// the same site.
    pub fn rooted_base_path(&self) -> String {
        let trimmed = self.base_path.trim();
        if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        }
    }

    /// Resolver base: the base path, prefixed with the origin for remote sites.
    pub fn resolver(&self) -> PathResolver {
        match &self.site {
            SiteLocation::Dir(_) => PathResolver::new(self.rooted_base_path()),
            SiteLocation::Url(origin) => PathResolver::new(format!(
                "{}/{}",
                origin.trim_end_matches('/'),
                self.base_path.trim_start_matches('/')
            )),
        }
    }

    pub fn transport(&self) -> Box<dyn Transport> {
        match &self.site {
            SiteLocation::Dir(root) => {
                Box::new(DirectoryTransport::new(root, &self.rooted_base_path()))
            }
            SiteLocation::Url(_) => Box::new(HttpTransport::new(self.timeout)),
        }
    }

    pub fn fetcher(&self) -> JsonFetcher<Box<dyn Transport>> {
        JsonFetcher::new(self.resolver(), self.transport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = SiteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.resolver().resolve("/data/a.json"), "/data/a.json");
    }

    #[test]
    fn reads_environment_values() {
        let config = SiteConfig::from_lookup(lookup(&[
            (ENV_SITE, "https://example.github.io/"),
            (ENV_BASE_PATH, "/portfolio/"),
            (ENV_TIMEOUT_SECS, "15"),
        ]))
        .unwrap();
        assert_eq!(
            config.site,
            SiteLocation::Url("https://example.github.io/".to_string())
        );
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(
            config.resolver().resolve("/data/profile.json"),
            "https://example.github.io/portfolio/data/profile.json"
        );
    }

    #[test]
    fn zero_or_blank_timeout_disables_it() {
        let mut config = SiteConfig::default();
        config.set_timeout_secs("5").unwrap();
        config.set_timeout_secs("0").unwrap();
        assert_eq!(config.timeout, None);
        config.set_timeout_secs(" ").unwrap();
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = SiteConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(format!("{err:#}").contains(ENV_TIMEOUT_SECS));
    }

    #[test]
    fn site_location_parsing() {
        assert_eq!(
            SiteLocation::parse("HTTP://host"),
            SiteLocation::Url("HTTP://host".to_string())
        );
        assert_eq!(
            SiteLocation::parse("./dist"),
            SiteLocation::Dir(PathBuf::from("./dist"))
        );
    }

    #[test]
    fn directory_sites_resolve_under_base_path() {
        let config = SiteConfig {
            site: SiteLocation::Dir(PathBuf::from("dist")),
            base_path: "/portfolio/".to_string(),
            timeout: None,
        };
        assert_eq!(
            config.resolver().resolve("data/x.json"),
            "/portfolio/data/x.json"
        );
    }

    #[test]
    fn unslashed_base_path_is_rooted() {
        let config = SiteConfig::from_lookup(lookup(&[(ENV_BASE_PATH, "portfolio")])).unwrap();
        assert_eq!(config.rooted_base_path(), "/portfolio");
        assert_eq!(
            config.resolver().resolve("/data/strings.json"),
            "/portfolio/data/strings.json"
        );
        assert_eq!(SiteConfig::default().rooted_base_path(), "/");
    }
}
