//! Data staging state machine.
//!
//! [`DataProvider`] walks a fixed, linear lifecycle:
//!
//! `Idle -> Preparing -> Loading -> Loaded -> Evaluated`
//!
//! Each call to [`DataProvider::advance`] performs the work attached to the
//! current state and moves exactly one step along [`Status::next`]. Loading
//! issues every fetch sequentially on the caller's thread. The staged set is
//! published only once `Evaluated` is reached; before that the query methods
//! answer with empty defaults.

use crate::content::{
    BindError, CategoriesDocument, Category, Section, SectionsDocument, StagedData, bind,
    load_section_data,
};
use crate::fetch::{JsonFetcher, Transport};
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

pub const STRINGS_PATH: &str = "/data/strings.json";
pub const PROFILE_PATH: &str = "/data/profile.json";
pub const CATEGORIES_PATH: &str = "/data/categories.json";
pub const SECTIONS_PATH: &str = "/data/sections.json";

/// Lifecycle of a staging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Preparing,
    Loading,
    Loaded,
    Evaluated,
}

impl Status {
    /// Transition table. `Evaluated` maps to itself.
    pub fn next(self) -> Status {
        match self {
            Status::Idle => Status::Preparing,
            Status::Preparing => Status::Loading,
            Status::Loading => Status::Loaded,
            Status::Loaded => Status::Evaluated,
            Status::Evaluated => Status::Evaluated,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Status::Evaluated
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Preparing => "preparing",
            Status::Loading => "loading",
            Status::Loaded => "loaded",
            Status::Evaluated => "evaluated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure that replaced the staged set with an empty one.
#[derive(Debug)]
pub enum StagingError {
    Bind(BindError),
    Malformed {
        document: &'static str,
        error: serde_json::Error,
    },
}

impl fmt::Display for StagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagingError::Bind(err) => write!(f, "{err}"),
            StagingError::Malformed { document, error } => {
                write!(f, "{document} is malformed: {error}")
            }
        }
    }
}

impl std::error::Error for StagingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StagingError::Bind(err) => Some(err),
            StagingError::Malformed { error, .. } => Some(error),
        }
    }
}

impl From<BindError> for StagingError {
    fn from(err: BindError) -> Self {
        StagingError::Bind(err)
    }
}

/// Stages site content and exposes it through read-only accessors.
pub struct DataProvider<T> {
    fetcher: JsonFetcher<T>,
    settings: Map<String, Value>,
    status: Status,
    staged: Option<StagedData>,
    fallback: StagedData,
    warnings: Vec<String>,
    last_error: Option<StagingError>,
}

impl<T: Transport> DataProvider<T> {
    /// `settings` come from the host and are carried into every staged set.
    pub fn new(fetcher: JsonFetcher<T>, settings: Map<String, Value>) -> Self {
        Self {
            fetcher,
            settings,
            status: Status::Idle,
            staged: None,
            fallback: StagedData::default(),
            warnings: Vec::new(),
            last_error: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Run the current state's action and step to the next state.
    pub fn advance(&mut self) -> Status {
        let current = self.status;
        match current {
            Status::Idle => {}
            Status::Preparing => {
                self.staged = None;
                self.warnings.clear();
                self.last_error = None;
            }
            Status::Loading => {
                let staged = match self.load() {
                    Ok(staged) => staged,
                    Err(err) => {
                        error!("data provider: error loading data: {err}");
                        self.last_error = Some(err);
                        StagedData::empty(self.settings.clone())
                    }
                };
                self.staged = Some(staged);
            }
            Status::Loaded => {
                let warnings = self
                    .staged
                    .as_ref()
                    .map(validate_staged)
                    .unwrap_or_default();
                for warning in &warnings {
                    warn!("data provider: {warning}");
                }
                self.warnings = warnings;
            }
            Status::Evaluated => return current,
        }

        self.status = current.next();
        info!("data provider status: {}", self.status);
        if self.status.is_terminal() {
            let staged = self.snapshot();
            info!(
                "data provider: data loaded ({} categories, {} sections)",
                staged.categories.len(),
                staged.sections.len()
            );
        }
        self.status
    }

    /// Advance until `Evaluated` and return the published set.
    pub fn run_to_completion(&mut self) -> &StagedData {
        while !self.status.is_terminal() {
            self.advance();
        }
        self.snapshot()
    }

    /// Re-enter `Idle`; the next advance restarts the whole sequence.
    pub fn reload(&mut self) {
        self.status = Status::Idle;
        info!("data provider status: {}", self.status);
    }

    /// The published set, once evaluated.
    pub fn staged(&self) -> Option<&StagedData> {
        if self.status.is_terminal() {
            self.staged.as_ref()
        } else {
            None
        }
    }

    pub fn profile(&self) -> &Map<String, Value> {
        &self.snapshot().profile
    }

    pub fn settings(&self) -> &Map<String, Value> {
        &self.snapshot().settings
    }

    pub fn strings(&self) -> &Map<String, Value> {
        &self.snapshot().strings
    }

    pub fn sections(&self) -> &[Section] {
        &self.snapshot().sections
    }

    pub fn categories(&self) -> &[Category] {
        &self.snapshot().categories
    }

    /// Warnings from the most recent validation pass.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The failure that emptied the most recent staged set, if any.
    pub fn last_error(&self) -> Option<&StagingError> {
        self.last_error.as_ref()
    }

    fn snapshot(&self) -> &StagedData {
        self.staged().unwrap_or(&self.fallback)
    }

    fn load(&self) -> Result<StagedData, StagingError> {
        let strings = object_or_empty(self.fetcher.load_json(STRINGS_PATH), STRINGS_PATH);
        let profile = object_or_empty(self.fetcher.load_json(PROFILE_PATH), PROFILE_PATH);
        let categories: CategoriesDocument =
            parse_document(self.fetcher.load_json(CATEGORIES_PATH), CATEGORIES_PATH)?;
        let sections: SectionsDocument =
            parse_document(self.fetcher.load_json(SECTIONS_PATH), SECTIONS_PATH)?;

        let mut categories = categories.into_categories();
        let mut sections = sections.into_sections();

        if !categories.is_empty() && !sections.is_empty() {
            bind(&mut categories, &mut sections)?;
            load_section_data(&self.fetcher, &mut sections);
        }

        Ok(StagedData {
            strings,
            profile,
            settings: self.settings.clone(),
            sections,
            categories,
        })
    }
}

/// Post-load checks. Findings are advisory and never block evaluation.
pub fn validate_staged(staged: &StagedData) -> Vec<String> {
    if staged.categories.is_empty() {
        return vec!["no categories loaded; the portfolio may not display correctly".to_string()];
    }

    let empty: Vec<&str> = staged
        .categories
        .iter()
        .filter(|category| category.sections.is_empty())
        .map(|category| category.id.as_str())
        .collect();
    if empty.is_empty() {
        return Vec::new();
    }
    vec![format!(
        "the following {} categories are empty: \"{}\"",
        empty.len(),
        empty.join(",")
    )]
}

fn object_or_empty(value: Option<Value>, document: &str) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map,
        Some(other) => {
            warn!("{document} is not a JSON object (found {}), ignoring it", kind(&other));
            Map::new()
        }
        None => Map::new(),
    }
}

fn parse_document<D>(value: Option<Value>, document: &'static str) -> Result<D, StagingError>
where
    D: DeserializeOwned + Default,
{
    match value {
        Some(value @ Value::Object(_)) => {
            serde_json::from_value(value).map_err(|error| StagingError::Malformed { document, error })
        }
        Some(other) => {
            warn!("{document} is not a JSON object (found {}), ignoring it", kind(&other));
            Ok(D::default())
        }
        None => Ok(D::default()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
