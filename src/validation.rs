//! Content checks for a site's `data/` documents.
//!
//! Used by `check-content` to catch authoring mistakes before deploy. Unlike
//! staging, which stops at the first dangling reference, the checker walks the
//! whole site and reports every problem it finds. Findings split into errors
//! (the site will not stage correctly) and warnings (it will, but something
//! looks unfinished).

use crate::content::{CategoriesDocument, CategoryId, SectionId, SectionsDocument};
use crate::fetch::{JsonFetcher, Transport};
use crate::provider::{CATEGORIES_PATH, PROFILE_PATH, SECTIONS_PATH, STRINGS_PATH};
use anyhow::{Context, Result, anyhow};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

const CATEGORIES_SCHEMA: &str = include_str!("../schema/categories.schema.json");
const SECTIONS_SCHEMA: &str = include_str!("../schema/sections.schema.json");

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContentReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ContentReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every content document reachable through `fetcher`.
///
/// Only a broken bundled schema is an `Err`; content problems land in the
/// report.
pub fn check_site<T: Transport>(fetcher: &JsonFetcher<T>) -> Result<ContentReport> {
    let mut report = ContentReport::default();

    for path in [STRINGS_PATH, PROFILE_PATH] {
        match fetcher.load_json(path) {
            Some(Value::Object(_)) => {}
            Some(_) => report.errors.push(format!("{path}: expected a JSON object")),
            None => report
                .warnings
                .push(format!("{path}: missing or unreadable, defaults to empty")),
        }
    }

    let categories = load_checked(fetcher, CATEGORIES_PATH, CATEGORIES_SCHEMA, &mut report)?
        .and_then(|value| parse_or_report::<CategoriesDocument>(value, CATEGORIES_PATH, &mut report))
        .and_then(|doc| doc.categories)
        .unwrap_or_default();
    let sections = load_checked(fetcher, SECTIONS_PATH, SECTIONS_SCHEMA, &mut report)?
        .and_then(|value| parse_or_report::<SectionsDocument>(value, SECTIONS_PATH, &mut report))
        .and_then(|doc| doc.sections)
        .unwrap_or_default();

    let mut category_ids: BTreeSet<&CategoryId> = BTreeSet::new();
    for category in &categories {
        if !category_ids.insert(&category.id) {
            report
                .errors
                .push(format!("duplicate category id \"{}\"", category.id));
        }
    }

    let mut section_ids: BTreeSet<&SectionId> = BTreeSet::new();
    let mut per_category: BTreeMap<&CategoryId, usize> = BTreeMap::new();
    for section in &sections {
        if !section_ids.insert(&section.id) {
            report
                .errors
                .push(format!("duplicate section id \"{}\"", section.id));
        }
        if category_ids.contains(&section.category_id) {
            *per_category.entry(&section.category_id).or_default() += 1;
        } else if !categories.is_empty() {
            report.errors.push(format!(
                "section with id \"{}\" has invalid category id \"{}\"",
                section.id, section.category_id
            ));
        }
        if let Some(path) = section.content_path() {
            if fetcher.load_json(path).is_none() {
                report.errors.push(format!(
                    "section with id \"{}\": {path} is missing or not valid JSON",
                    section.id
                ));
            }
        }
    }

    if categories.is_empty() {
        report
            .warnings
            .push("no categories defined; the portfolio may not display correctly".to_string());
    } else if sections.is_empty() {
        report
            .warnings
            .push("no sections defined; categories will not be bound".to_string());
    } else {
        for id in &category_ids {
            if !per_category.contains_key(id) {
                report.warnings.push(format!("category \"{id}\" has no sections"));
            }
        }
    }

    Ok(report)
}

fn load_checked<T: Transport>(
    fetcher: &JsonFetcher<T>,
    path: &str,
    schema_text: &str,
    report: &mut ContentReport,
) -> Result<Option<Value>> {
    let Some(value) = fetcher.load_json(path) else {
        report
            .warnings
            .push(format!("{path}: missing or unreadable, defaults to empty"));
        return Ok(None);
    };

    let schema: Value =
        serde_json::from_str(schema_text).with_context(|| format!("parsing schema for {path}"))?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling schema for {path}: {err}"))?;

    if let Err(errors) = compiled.validate(&value) {
        report
            .errors
            .extend(errors.map(|err| format!("{path}: {err}")));
        return Ok(None);
    }
    Ok(Some(value))
}

fn parse_or_report<D: serde::de::DeserializeOwned>(
    value: Value,
    path: &str,
    report: &mut ContentReport,
) -> Option<D> {
    match serde_json::from_value(value) {
        Ok(doc) => Some(doc),
        Err(err) => {
            report.errors.push(format!("{path}: {err}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::ScriptedTransport;
    use crate::paths::PathResolver;
    use serde_json::json;

    fn check(transport: ScriptedTransport) -> ContentReport {
        check_site(&JsonFetcher::new(PathResolver::default(), transport)).unwrap()
    }

    fn valid_site() -> ScriptedTransport {
        ScriptedTransport::default()
            .json(STRINGS_PATH, json!({}))
            .json(PROFILE_PATH, json!({"name": "Ada"}))
            .json(CATEGORIES_PATH, json!({"categories": [{"id": "a"}]}))
            .json(
                SECTIONS_PATH,
                json!({"sections": [{"id": 1, "categoryId": "a", "jsonPath": "/s/1.json"}]}),
            )
            .json("/s/1.json", json!({"items": []}))
    }

    #[test]
    fn bundled_schemas_compile() {
        for text in [CATEGORIES_SCHEMA, SECTIONS_SCHEMA] {
            let schema: Value = serde_json::from_str(text).unwrap();
            assert!(JSONSchema::compile(&schema).is_ok());
        }
    }

    #[test]
    fn valid_site_is_clean() {
        let report = check(valid_site());
        assert!(report.is_clean(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn reports_every_referential_problem() {
        let transport = valid_site()
            .json(
                CATEGORIES_PATH,
                json!({"categories": [{"id": "a"}, {"id": "a"}, {"id": "lonely"}]}),
            )
            .json(
                SECTIONS_PATH,
                json!({"sections": [
                    {"id": 1, "categoryId": "a"},
                    {"id": 1, "categoryId": "ghost"},
                    {"id": 2, "categoryId": "a", "jsonPath": "/s/missing.json"}
                ]}),
            );
        let report = check(transport);

        assert_eq!(report.errors.len(), 4, "{:?}", report.errors);
        assert!(report.errors.iter().any(|e| e.contains("duplicate category id \"a\"")));
        assert!(report.errors.iter().any(|e| e.contains("duplicate section id \"1\"")));
        assert!(report.errors.iter().any(|e| e.contains("\"ghost\"")));
        assert!(report.errors.iter().any(|e| e.contains("/s/missing.json")));
        assert!(report.warnings.iter().any(|w| w.contains("\"lonely\"")));
    }

    #[test]
    fn schema_violations_are_errors() {
        let transport = valid_site().json(
            SECTIONS_PATH,
            json!({"sections": [{"id": true, "jsonPath": 3}]}),
        );
        let report = check(transport);
        assert!(!report.is_clean());
        assert!(report.errors.iter().all(|e| e.starts_with(SECTIONS_PATH)));
    }

    #[test]
    fn missing_documents_are_warnings() {
        let report = check(ScriptedTransport::default());
        assert!(report.is_clean());
        assert!(report.warnings.iter().any(|w| w.contains(CATEGORIES_PATH)));
        assert!(report.warnings.iter().any(|w| w.contains("no categories")));
    }

    #[test]
    fn non_object_profile_is_an_error() {
        let report = check(valid_site().json(PROFILE_PATH, json!("Ada")));
        assert_eq!(report.errors, [format!("{PROFILE_PATH}: expected a JSON object")]);
    }
}
