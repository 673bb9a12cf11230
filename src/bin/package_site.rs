//! Copy the static content folders into the build output.

use anyhow::{Result, anyhow, bail};
use folio::packaging::{DEFAULT_FOLDERS, DEFAULT_OUT_DIR};
use folio::{init_logging, package_static_assets, split_list};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args_os().skip(1);
    let mut root = PathBuf::from(".");
    let mut out: Option<PathBuf> = None;
    let mut folders: Vec<String> = Vec::new();
    let mut verbose = false;

    while let Some(arg_os) = args.next() {
        let arg = arg_os
            .into_string()
            .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
        match arg.as_str() {
            "--root" => root = PathBuf::from(next_value(&mut args, "--root")?),
            "--out" => out = Some(PathBuf::from(next_value(&mut args, "--out")?)),
            "--folder" | "--folders" => {
                folders.extend(split_list(&next_value(&mut args, "--folder")?))
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                print!("{}", usage());
                return Ok(());
            }
            other => bail!("unknown flag: {other}\n{}", usage()),
        }
    }
    init_logging(verbose);

    if folders.is_empty() {
        folders = DEFAULT_FOLDERS.iter().map(|s| s.to_string()).collect();
    }
    let out = out.unwrap_or_else(|| root.join(DEFAULT_OUT_DIR));

    let report = package_static_assets(&root, &out, &folders)?;
    for folder in &report.copied_folders {
        println!("copied {folder}/ to {}", out.display());
    }
    for folder in &report.skipped_folders {
        println!("skipped {folder}/ (not found)");
    }
    println!("created {}", report.marker.display());
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
    "Usage: package-site [--root DIR] [--out DIR] [--folder NAME[,NAME...]]... [--verbose]\n\
Copies data/, images/ and audio/ (or the named folders) into the output dir and writes .nojekyll.\n"
}
