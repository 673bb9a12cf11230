//! Stage a site's content and print the published data set as JSON.
//!
//! Runs the full provider lifecycle against a local directory or a remote
//! origin, then prints the staged set (or one value from it, selected by JSON
//! Pointer). Exits non-zero when staging had to fall back to an empty set.

use anyhow::{Context, Result, anyhow, bail};
use folio::{DataProvider, SiteConfig, SiteLocation, init_logging};
use serde_json::{Map, Value};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse_from(env::args_os().skip(1))?;
    if args.help {
        print!("{}", usage());
        return Ok(());
    }
    init_logging(args.verbose);

    let mut config = SiteConfig::from_env()?;
    args.apply(&mut config)?;
    let settings = match &args.settings {
        Some(path) => read_settings(path)?,
        None => Map::new(),
    };

    let mut provider = DataProvider::new(config.fetcher(), settings);
    let staged = serde_json::to_value(provider.run_to_completion())?;

    let selected = if args.pointer.is_empty() {
        &staged
    } else {
        staged
            .pointer(&args.pointer)
            .ok_or_else(|| anyhow!("pointer {} not found in staged data", args.pointer))?
    };
    let rendered = if args.compact {
        serde_json::to_string(selected)?
    } else {
        serde_json::to_string_pretty(selected)?
    };
    println!("{rendered}");

    if let Some(err) = provider.last_error() {
        bail!("staging fell back to empty data: {err}");
    }
    Ok(())
}

fn read_settings(path: &Path) -> Result<Map<String, Value>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    match serde_json::from_str::<Value>(&raw).with_context(|| format!("parsing {}", path.display()))? {
        Value::Object(map) => Ok(map),
        _ => bail!("settings file {} must contain a JSON object", path.display()),
    }
}

#[derive(Debug, Default)]
struct CliArgs {
    site: Option<String>,
    base: Option<String>,
    timeout: Option<String>,
    settings: Option<PathBuf>,
    pointer: String,
    compact: bool,
    verbose: bool,
    help: bool,
}

impl CliArgs {
    fn parse_from(mut args: impl Iterator<Item = OsString>) -> Result<Self> {
        let mut parsed = CliArgs::default();
        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--site" => parsed.site = Some(next_value(&mut args, "--site")?),
                "--base" => parsed.base = Some(next_value(&mut args, "--base")?),
                "--timeout" => parsed.timeout = Some(next_value(&mut args, "--timeout")?),
                "--settings" => {
                    parsed.settings = Some(PathBuf::from(next_value(&mut args, "--settings")?))
                }
                "--pointer" => {
                    let raw = next_value(&mut args, "--pointer")?;
                    if !raw.is_empty() && !raw.starts_with('/') {
                        bail!("--pointer must be empty (root) or start with '/'");
                    }
                    parsed.pointer = raw;
                }
                "--compact" => parsed.compact = true,
                "--verbose" | "-v" => parsed.verbose = true,
                "--help" | "-h" => parsed.help = true,
                other => bail!("unknown flag: {other}\n{}", usage()),
            }
        }
        Ok(parsed)
    }

    fn apply(&self, config: &mut SiteConfig) -> Result<()> {
        if let Some(site) = &self.site {
            config.site = SiteLocation::parse(site);
        }
        if let Some(base) = &self.base {
            config.base_path = base.clone();
        }
        if let Some(timeout) = &self.timeout {
            config.set_timeout_secs(timeout)?;
        }
        Ok(())
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: stage-site [--site DIR|URL] [--base PATH] [--timeout SECS] [--settings FILE] [--pointer /json/pointer] [--compact] [--verbose]\n\
Stages the site's data/ documents and prints the merged data set as JSON.\n\
Defaults come from FOLIO_SITE, FOLIO_BASE_PATH and FOLIO_TIMEOUT_SECS.\n"
}
