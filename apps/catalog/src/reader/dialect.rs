//! Reader dialects
//!
//! A dialect knows which variables a given output needs and how to assemble
//! loaded [`Values`] into a record. The generic reader handles loading.

use crate::models::{ElementSetType, MetadataRecord};
use crate::reader::Values;
use crate::Result;
use serde_json::{Map, Value};

/// Dublin Core elements in output order. `BRIEF` returns the first
/// [`BRIEF_LEN`], `SUMMARY` the first [`SUMMARY_LEN`], `FULL` all of them.
pub const DUBLIN_CORE_ELEMENTS: &[&str] = &[
    "identifier",
    "title",
    "type",
    "BoundingBox",
    "subject",
    "format",
    "relation",
    "modified",
    "abstract",
    "spatial",
    "creator",
    "publisher",
    "contributor",
    "date",
    "language",
    "description",
    "rights",
    "source",
    "coverage",
];

const BRIEF_LEN: usize = 4;
const SUMMARY_LEN: usize = 10;

/// Dublin Core elements to produce.
///
/// `element_names` wins when non-empty and is matched case-insensitively;
/// unknown names are ignored. Otherwise the element set decides.
pub fn select_dublin_core_elements(
    element_set: ElementSetType,
    element_names: &[String],
) -> Vec<&'static str> {
    if !element_names.is_empty() {
        return DUBLIN_CORE_ELEMENTS
            .iter()
            .copied()
            .filter(|element| {
                element_names.iter().any(|name| {
                    let name = name.rsplit(':').next().unwrap_or(name);
                    name.eq_ignore_ascii_case(element)
                })
            })
            .collect();
    }

    let len = match element_set {
        ElementSetType::Brief => BRIEF_LEN,
        ElementSetType::Summary => SUMMARY_LEN,
        ElementSetType::Full => DUBLIN_CORE_ELEMENTS.len(),
    };
    DUBLIN_CORE_ELEMENTS[..len].to_vec()
}

pub trait ReaderDialect: Send + Sync {
    /// Variables needed to build an ISO 19115 record.
    fn variables_for_iso(&self) -> Vec<String>;

    /// Variables needed to build a Dublin Core record with the selected
    /// elements.
    fn variables_for_dublin_core(
        &self,
        element_set: ElementSetType,
        element_names: &[String],
    ) -> Vec<String>;

    fn get_iso(&self, identifier: &str, values: &Values) -> Result<MetadataRecord>;

    fn get_dublin_core(
        &self,
        identifier: &str,
        values: &Values,
        element_set: ElementSetType,
        element_names: &[String],
    ) -> Result<MetadataRecord>;
}

/// Insert `key` only when there is something to insert: one value becomes a
/// string, several an array.
pub(crate) fn put_values(target: &mut Map<String, Value>, key: &str, values: &[String]) {
    match values {
        [] => {}
        [single] => {
            target.insert(key.to_string(), Value::String(single.clone()));
        }
        many => {
            target.insert(
                key.to_string(),
                Value::Array(many.iter().cloned().map(Value::String).collect()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_sets_take_prefixes() {
        assert_eq!(
            select_dublin_core_elements(ElementSetType::Brief, &[]),
            ["identifier", "title", "type", "BoundingBox"]
        );
        assert_eq!(
            select_dublin_core_elements(ElementSetType::Summary, &[]).len(),
            10
        );
        assert_eq!(
            select_dublin_core_elements(ElementSetType::Full, &[]).len(),
            DUBLIN_CORE_ELEMENTS.len()
        );
    }

    #[test]
    fn element_names_override_element_set() {
        let names = vec![
            "dc:Title".to_string(),
            "rights".to_string(),
            "unknown".to_string(),
        ];
        assert_eq!(
            select_dublin_core_elements(ElementSetType::Full, &names),
            ["title", "rights"]
        );
    }

    #[test]
    fn put_values_shapes_by_count() {
        let mut map = Map::new();
        put_values(&mut map, "none", &[]);
        put_values(&mut map, "one", &["a".to_string()]);
        put_values(&mut map, "two", &["a".to_string(), "b".to_string()]);
        assert!(!map.contains_key("none"));
        assert_eq!(map["one"], "a");
        assert_eq!(map["two"], serde_json::json!(["a", "b"]));
    }
}
