//! Lint a site's content documents before deploying it.
//!
//! Prints one line per finding (`error:` or `warning:`) and exits 1 when any
//! error was found.

use anyhow::{Result, anyhow, bail};
use folio::{SiteConfig, SiteLocation, check_site, init_logging};
use std::env;
use std::ffi::OsString;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args_os().skip(1);
    let mut config = SiteConfig::from_env()?;
    let mut verbose = false;

    while let Some(arg_os) = args.next() {
        let arg = arg_os
            .into_string()
            .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
        match arg.as_str() {
            "--site" => config.site = SiteLocation::parse(&next_value(&mut args, "--site")?),
            "--base" => config.base_path = next_value(&mut args, "--base")?,
            "--timeout" => config.set_timeout_secs(&next_value(&mut args, "--timeout")?)?,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                print!("{}", usage());
                return Ok(());
            }
            other => bail!("unknown flag: {other}\n{}", usage()),
        }
    }
    init_logging(verbose);

    let report = check_site(&config.fetcher())?;
    for error in &report.errors {
        println!("error: {error}");
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }

    if !report.is_clean() {
        bail!("{} content error(s) found", report.errors.len());
    }
    Ok(())
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
    "Usage: check-content [--site DIR|URL] [--base PATH] [--timeout SECS] [--verbose]\n\
Validates data/categories.json and data/sections.json, cross-checks ids and section documents.\n"
}
