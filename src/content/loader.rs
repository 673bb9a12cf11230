use crate::content::model::Section;
use crate::fetch::{JsonFetcher, Transport};
use log::{debug, warn};
use serde_json::{Map, Value};

/// Attach each section's secondary document as `data`, one fetch at a time.
///
/// A document that cannot be loaded becomes an empty object so a single bad
/// file never aborts the batch. Sections without a path are left untouched.
pub fn load_section_data<T: Transport>(fetcher: &JsonFetcher<T>, sections: &mut [Section]) {
    for section in sections.iter_mut() {
        let Some(path) = section.content_path() else {
            continue;
        };
        let data = match fetcher.load_json(path) {
            Some(value) => value,
            None => {
                warn!(
                    "section \"{}\": no data loaded from {path}, using an empty object",
                    section.id
                );
                Value::Object(Map::new())
            }
        };
        debug!("section \"{}\": attached data from {path}", section.id);
        section.data = Some(data);
    }
}
