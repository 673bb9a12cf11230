//! Deserializable representation of the site content documents.
//!
//! Categories and sections keep every authored display field verbatim in a
//! flattened map; only the fields staging depends on are typed. Derived fields
//! (`Category::sections`, `Section::category`, `Section::data`) are filled in
//! during staging and serialize back out alongside the authored ones.

use crate::content::identity::{CategoryId, SectionId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize, Serialize)]
/// A grouping of sections shown together in navigation.
pub struct Category {
    pub id: CategoryId,
    /// Ids of the bound sections, in section-file order.
    #[serde(default, skip_deserializing)]
    pub sections: Vec<SectionId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
/// One content section and its optional secondary document.
pub struct Section {
    pub id: SectionId,
    #[serde(rename = "categoryId")]
    pub category_id: CategoryId,
    #[serde(rename = "jsonPath", default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Back-reference to the owning category, set by the binder.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Category {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: CategoryId(id.into()),
            sections: Vec::new(),
            fields: Map::new(),
        }
    }

    /// Discard an authored `sections` key; the list is derived by the binder.
    fn drop_derived_fields(&mut self) {
        self.fields.remove("sections");
    }
}

impl Section {
    pub fn new(id: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            id: SectionId(id.into()),
            category_id: CategoryId(category_id.into()),
            json_path: None,
            data: None,
            category: None,
            fields: Map::new(),
        }
    }

    pub fn with_json_path(mut self, path: impl Into<String>) -> Self {
        self.json_path = Some(path.into());
        self
    }

    /// The secondary document path as authored. Empty strings count as absent.
    pub fn content_path(&self) -> Option<&str> {
        self.json_path.as_deref().filter(|path| !path.is_empty())
    }

    /// Discard an authored `category` key; the back-reference is set by the binder.
    fn drop_derived_fields(&mut self) {
        self.fields.remove("category");
    }
}

#[derive(Debug, Default, Deserialize)]
/// Shape of `categories.json`.
pub struct CategoriesDocument {
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

#[derive(Debug, Default, Deserialize)]
/// Shape of `sections.json`.
pub struct SectionsDocument {
    #[serde(default)]
    pub sections: Option<Vec<Section>>,
}

impl CategoriesDocument {
    /// The declared categories with authored derived keys removed.
    pub fn into_categories(self) -> Vec<Category> {
        let mut categories = self.categories.unwrap_or_default();
        categories.iter_mut().for_each(Category::drop_derived_fields);
        categories
    }
}

impl SectionsDocument {
    /// The declared sections with authored derived keys removed.
    pub fn into_sections(self) -> Vec<Section> {
        let mut sections = self.sections.unwrap_or_default();
        sections.iter_mut().for_each(Section::drop_derived_fields);
        sections
    }
}

#[derive(Clone, Debug, Default, Serialize)]
/// The merged content exposed to consumers once staging completes.
pub struct StagedData {
    pub strings: Map<String, Value>,
    pub profile: Map<String, Value>,
    pub settings: Map<String, Value>,
    pub sections: Vec<Section>,
    pub categories: Vec<Category>,
}

impl StagedData {
    /// Well-formed set with no content, keeping the host settings.
    pub fn empty(settings: Map<String, Value>) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|section| &section.id == id)
    }

    /// Sections bound to `category`, resolved through their ids.
    pub fn sections_in<'a>(&'a self, category: &'a Category) -> impl Iterator<Item = &'a Section> {
        category.sections.iter().filter_map(|id| self.section(id))
    }

    /// Follow a section's back-reference to its category, if bound.
    pub fn category_of(&self, section: &Section) -> Option<&Category> {
        self.category(section.category.as_ref()?)
    }
}
