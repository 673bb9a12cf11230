//! Content staging for a static portfolio site.
//!
//! The site ships its content as JSON under `data/`: UI strings, the owner's
//! profile, categories, sections, and one optional document per section. This
//! crate resolves those paths against the site's base prefix, fetches them
//! through a [`fetch::Transport`], binds sections to categories, and publishes
//! the merged result from [`provider::DataProvider`]. The binaries wrap the
//! same pieces: `stage-site` prints the staged set, `check-content` lints a
//! site, and `package-site` copies the static folders into the build output.

pub mod config;
pub mod content;
pub mod fetch;
pub mod packaging;
pub mod paths;
pub mod provider;
pub mod validation;

pub use config::{SiteConfig, SiteLocation};
pub use content::{
    BindError, Category, CategoryId, Section, SectionId, StagedData, bind, load_section_data,
};
pub use fetch::{DirectoryTransport, HttpTransport, JsonFetcher, Transport, TransportResponse};
pub use packaging::{PackageReport, package_static_assets};
pub use paths::PathResolver;
pub use provider::{DataProvider, StagingError, Status};
pub use validation::{ContentReport, check_site};

/// Initialize `env_logger` for the binaries.
///
/// `RUST_LOG` is honored; without it only warnings and errors are shown.
/// `verbose` forces debug output regardless of the environment.
pub fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

/// Split comma- or whitespace-delimited lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
