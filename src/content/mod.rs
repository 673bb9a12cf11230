//! Site content: typed documents, category/section binding and section data.
//!
//! `model` mirrors the JSON files under `data/`, `binder` links sections to
//! categories by id, and `loader` pulls in each section's secondary document.

pub mod binder;
pub mod identity;
pub mod loader;
pub mod model;

pub use binder::{BindError, bind};
pub use identity::{CategoryId, SectionId};
pub use loader::load_section_data;
pub use model::{Category, CategoriesDocument, Section, SectionsDocument, StagedData};
