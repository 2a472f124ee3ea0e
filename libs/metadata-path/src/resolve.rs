//! Path resolution over JSON metadata graphs

use crate::path::{Discriminator, MetadataPath};
use crate::value::leaf_value;
use serde_json::Value;

/// A metadata object a path can be evaluated against.
pub trait PathTarget {
    /// Standard name, e.g. `ISO 19115` or `Catalog Web Service`.
    fn standard(&self) -> &str;

    /// Root class, e.g. `MD_Metadata` or `Record`.
    fn root_class(&self) -> &str;

    /// Content of the root object.
    fn content(&self) -> &Value;
}

/// Standards whose records also accept paths written for another standard.
const STANDARD_ALIASES: &[(&str, &str)] = &[("ISO 19115", "ISO 19115-2")];

/// Root classes that specialise another root class.
const ROOT_ALIASES: &[(&str, &str)] = &[("MD_Metadata", "MI_Metadata")];

fn name_matches(aliases: &[(&str, &str)], path_name: &str, target_name: &str) -> bool {
    path_name.eq_ignore_ascii_case(target_name)
        || aliases.iter().any(|(base, derived)| {
            base.eq_ignore_ascii_case(path_name) && derived.eq_ignore_ascii_case(target_name)
        })
}

impl MetadataPath {
    /// Whether this path is written for the target's standard and root class.
    pub fn applies_to<T: PathTarget + ?Sized>(&self, target: &T) -> bool {
        name_matches(STANDARD_ALIASES, self.standard(), target.standard())
            && name_matches(ROOT_ALIASES, self.root(), target.root_class())
    }

    /// Resolve every non-null leaf reachable through this path.
    ///
    /// Returns an empty vector when the path does not apply to the target or
    /// any step fails to resolve.
    pub fn resolve<T: PathTarget + ?Sized>(&self, target: &T) -> Vec<String> {
        if !self.applies_to(target) {
            return Vec::new();
        }

        let mut current: Vec<&Value> = vec![target.content()];
        for step in self.steps() {
            let mut next = Vec::new();
            for node in current {
                if let Some(child) = node.as_object().and_then(|o| o.get(&step.property)) {
                    flatten_into(child, &mut next);
                }
            }

            if let Some(discriminator) = &step.discriminator {
                next.retain(|node| discriminator_matches(node, discriminator));
            }

            if next.is_empty() {
                return Vec::new();
            }
            current = next;
        }

        current.into_iter().filter_map(leaf_value).collect()
    }
}

fn flatten_into<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        other => out.push(other),
    }
}

fn discriminator_matches(node: &Value, discriminator: &Discriminator) -> bool {
    let Some(attribute) = node
        .as_object()
        .and_then(|o| o.get(&discriminator.attribute))
    else {
        return false;
    };

    let mut candidates = Vec::new();
    flatten_into(attribute, &mut candidates);
    candidates
        .into_iter()
        .filter_map(leaf_value)
        .any(|v| v.eq_ignore_ascii_case(&discriminator.value))
}
