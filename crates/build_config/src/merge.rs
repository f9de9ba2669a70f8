//! Generic recursive merge of configuration trees.
//!
//! Objects merge key by key. Everything else (scalars, sequences and
//! explicit `null`) coming from the higher-precedence side replaces what was
//! there before. Field-specific mergers ([`crate::publish`],
//! [`crate::file_set`]) intercept their fields before or after this runs.

use serde_json::{Map, Value};

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;

/// Merges `source` into `target`, with `source` taking precedence.
pub fn deep_merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match value {
            Value::Object(incoming) => {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    deep_merge(existing, incoming);
                    continue;
                }
                target.insert(key, Value::Object(incoming));
            }
            other => {
                target.insert(key, other);
            }
        }
    }
}
