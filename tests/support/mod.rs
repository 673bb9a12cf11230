use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

pub const STAGE_SITE: &str = env!("CARGO_BIN_EXE_stage-site");
pub const CHECK_CONTENT: &str = env!("CARGO_BIN_EXE_check-content");
pub const PACKAGE_SITE: &str = env!("CARGO_BIN_EXE_package-site");

/// Write `value` as pretty JSON at `root/relative`, creating parents.
pub fn write_json(root: &Path, relative: &str, value: &Value) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// A small but complete portfolio: two categories, three sections, one
/// section document.
pub fn sample_site() -> Result<TempDir> {
    let dir = TempDir::new().context("failed to allocate site dir")?;
    let root = dir.path();
    write_json(root, "data/strings.json", &json!({"nav_home": "Home"}))?;
    write_json(
        root,
        "data/profile.json",
        &json!({"name": "Ada Lovelace", "role": "Engineer"}),
    )?;
    write_json(
        root,
        "data/categories.json",
        &json!({"categories": [
            {"id": "about", "label": "About"},
            {"id": "work", "label": "Work"}
        ]}),
    )?;
    write_json(
        root,
        "data/sections.json",
        &json!({"sections": [
            {"id": "intro", "categoryId": "about", "jsonPath": "/data/sections/intro.json"},
            {"id": "jobs", "categoryId": "work"},
            {"id": "skills", "categoryId": "about"}
        ]}),
    )?;
    write_json(
        root,
        "data/sections/intro.json",
        &json!({"paragraphs": ["Hello."]}),
    )?;
    Ok(dir)
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Command with the folio environment cleared so host settings do not leak in.
pub fn folio_command(bin: &str) -> Command {
    let mut cmd = Command::new(bin);
    cmd.env_remove("FOLIO_SITE")
        .env_remove("FOLIO_BASE_PATH")
        .env_remove("FOLIO_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}
