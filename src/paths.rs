//! Turns logical asset paths into fetchable URLs.
//!
//! Content files are authored with site-absolute paths such as
//! `/data/sections.json`. When the site is served under a sub-path (or from a
//! remote origin) the resolver prefixes them with the configured base. The
//! base is handed in explicitly; nothing here reads process state.

/// Joins content paths onto a base prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    base: String,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new("/")
    }
}

impl PathResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve `path` against the base prefix.
    ///
    /// Empty paths and scheme-prefixed URLs come back unchanged. Everything
    /// else is joined to the base with a single `/` and any repeated
    /// separators outside a `scheme://` marker are collapsed.
    pub fn resolve(&self, path: &str) -> String {
        if path.is_empty() || has_scheme(path) {
            return path.to_string();
        }

        let clean = path.strip_prefix('/').unwrap_or(path);
        let joined = if self.base.is_empty() {
            clean.to_string()
        } else if self.base.ends_with('/') {
            format!("{}{clean}", self.base)
        } else {
            format!("{}/{clean}", self.base)
        };
        collapse_separators(&joined)
    }
}

/// True when `path` starts with `scheme://`.
pub fn has_scheme(path: &str) -> bool {
    let Some((scheme, _)) = path.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

fn collapse_separators(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev: Option<char> = None;
    let mut in_scheme_marker = false;
    for c in input.chars() {
        if c == '/' {
            if prev == Some(':') {
                in_scheme_marker = true;
            }
            if prev == Some('/') && !in_scheme_marker {
                continue;
            }
        } else {
            in_scheme_marker = false;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
