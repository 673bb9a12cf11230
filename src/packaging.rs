//! Copies static content folders into the deployable output.
//!
//! The client fetches `data/` at runtime and references `images/` and
//! `audio/` directly, so those folders ship next to the built bundle. An empty
//! `.nojekyll` marker keeps GitHub Pages from running Jekyll over the output
//! (which would drop underscore-prefixed files).

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_FOLDERS: &[&str] = &["data", "images", "audio"];
pub const DEFAULT_OUT_DIR: &str = "dist";
pub const NOJEKYLL_MARKER: &str = ".nojekyll";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// What a packaging run copied.
pub struct PackageReport {
    pub copied_folders: Vec<String>,
    pub skipped_folders: Vec<String>,
    pub files_copied: usize,
    pub marker: PathBuf,
}

/// Copy each existing `folders` entry from `project_root` into `out_dir`.
///
/// Missing folders are skipped. Existing files in the output are overwritten;
/// nothing is deleted. The marker file is always written.
pub fn package_static_assets(
    project_root: &Path,
    out_dir: &Path,
    folders: &[String],
) -> Result<PackageReport> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output dir {}", out_dir.display()))?;

    let mut report = PackageReport::default();
    for folder in folders {
        let src = project_root.join(folder);
        if !src.is_dir() {
            report.skipped_folders.push(folder.clone());
            continue;
        }
        let copied = copy_recursive(&src, &out_dir.join(folder))?;
        info!("copied {folder}/ to {} ({copied} files)", out_dir.display());
        report.files_copied += copied;
        report.copied_folders.push(folder.clone());
    }

    let marker = out_dir.join(NOJEKYLL_MARKER);
    fs::write(&marker, "").with_context(|| format!("writing {}", marker.display()))?;
    info!("created {}", marker.display());
    report.marker = marker;
    Ok(report)
}

fn copy_recursive(src: &Path, dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest).with_context(|| format!("creating {}", dest.display()))?;
    let mut copied = 0;
    for entry in fs::read_dir(src).with_context(|| format!("reading {}", src.display()))? {
        let entry = entry?;
        let path = entry.path();
        let target = dest.join(entry.file_name());
        if path.is_dir() {
            copied += copy_recursive(&path, &target)?;
        } else {
            fs::copy(&path, &target).with_context(|| {
                format!("copying {} to {}", path.display(), target.display())
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}
