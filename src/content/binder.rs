//! Links sections to their declared categories in both directions.
//!
//! Both sides hold ids rather than references: a category lists the ids of
//! its sections and a section names its category. A section that points at a
//! category which does not exist is an authoring bug and fails the bind.

use crate::content::identity::{CategoryId, SectionId};
use crate::content::model::{Category, Section};
use std::collections::BTreeMap;
use std::fmt;

/// Fatal content error raised while binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    UnknownCategory {
        section_id: SectionId,
        category_id: CategoryId,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::UnknownCategory {
                section_id,
                category_id,
            } => write!(
                f,
                "section with id \"{section_id}\" has invalid category id \"{category_id}\"; make sure the category exists within categories.json"
            ),
        }
    }
}

impl std::error::Error for BindError {}

/// Attach every section to its category, preserving section order.
///
/// Category `sections` lists are reset first, so binding the same
/// collections twice yields the same result. When category ids repeat, the
/// first declaration wins.
pub fn bind(categories: &mut [Category], sections: &mut [Section]) -> Result<(), BindError> {
    let mut by_id: BTreeMap<CategoryId, usize> = BTreeMap::new();
    for (idx, category) in categories.iter_mut().enumerate() {
        category.sections.clear();
        by_id.entry(category.id.clone()).or_insert(idx);
    }

    for section in sections.iter_mut() {
        let Some(&idx) = by_id.get(&section.category_id) else {
            return Err(BindError::UnknownCategory {
                section_id: section.id.clone(),
                category_id: section.category_id.clone(),
            });
        };
        categories[idx].sections.push(section.id.clone());
        section.category = Some(categories[idx].id.clone());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(category: &Category) -> Vec<&str> {
        category.sections.iter().map(SectionId::as_str).collect()
    }

    #[test]
    fn sections_follow_input_order_per_category() {
        let mut categories = vec![Category::new("a"), Category::new("b")];
        let mut sections = vec![
            Section::new("1", "a"),
            Section::new("2", "b"),
            Section::new("3", "a"),
        ];

        bind(&mut categories, &mut sections).unwrap();

        assert_eq!(ids(&categories[0]), ["1", "3"]);
        assert_eq!(ids(&categories[1]), ["2"]);
        for section in &sections {
            assert_eq!(section.category.as_ref(), Some(&section.category_id));
        }
    }

    #[test]
    fn unknown_category_names_both_ids() {
        let mut categories = vec![Category::new("a")];
        let mut sections = vec![Section::new("1", "a"), Section::new("9", "ghost")];

        let err = bind(&mut categories, &mut sections).unwrap_err();
        assert_eq!(
            err,
            BindError::UnknownCategory {
                section_id: SectionId::from("9"),
                category_id: CategoryId::from("ghost"),
            }
        );
        let message = err.to_string();
        assert!(message.contains("\"9\""));
        assert!(message.contains("\"ghost\""));
    }

    #[test]
    fn rebinding_resets_previous_lists() {
        let mut categories = vec![Category::new("a")];
        categories[0].sections.push(SectionId::from("stale"));
        let mut sections = vec![Section::new("1", "a")];

        bind(&mut categories, &mut sections).unwrap();
        bind(&mut categories, &mut sections).unwrap();

        assert_eq!(ids(&categories[0]), ["1"]);
    }

    #[test]
    fn categories_without_sections_end_up_empty() {
        let mut categories = vec![Category::new("a"), Category::new("empty")];
        let mut sections = vec![Section::new("1", "a")];

        bind(&mut categories, &mut sections).unwrap();

        assert!(categories[1].sections.is_empty());
    }
}
