//! Publish-target merging.
//!
//! Publish targets are positional: the first entry of a `publish` list is the
//! primary target. A single override object coming from a higher-precedence
//! layer therefore augments that first entry instead of replacing the list or
//! being appended to it.

use crate::configuration::PUBLISH_KEY;
use crate::merge::deep_merge;
use serde_json::{json, Map, Value};

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;

/// Merges `overlay` into `base`, applying the publish override rule.
///
/// 1. When `base.publish` is a list, `overlay.publish` is held back as the
///    override. A `null` override is not held back: it flows through the
///    generic merge and disables publishing.
/// 2. Everything else is deep merged.
/// 3. A record override is shallow-merged onto the first list element only.
///    An empty base list becomes a one-element list holding the record.
/// 4. Any other override shape (list, provider shorthand) replaces the list.
pub fn merge_publish(base: &mut Map<String, Value>, mut overlay: Map<String, Value>) {
    let override_value = match base.get(PUBLISH_KEY) {
        Some(Value::Array(_)) => match overlay.remove(PUBLISH_KEY) {
            Some(Value::Null) => {
                overlay.insert(PUBLISH_KEY.to_string(), Value::Null);
                None
            }
            taken => taken,
        },
        _ => None,
    };

    deep_merge(base, overlay);

    let Some(override_value) = override_value else {
        return;
    };

    let applied_to_primary = match (base.get_mut(PUBLISH_KEY), &override_value) {
        (Some(Value::Array(targets)), Value::Object(fields)) => match targets.first_mut() {
            Some(primary) => {
                // "github" is shorthand for { provider: "github" }
                if let Value::String(provider) = &*primary {
                    *primary = json!({ "provider": provider });
                }
                match primary {
                    Value::Object(primary) => {
                        for (key, value) in fields {
                            primary.insert(key.clone(), value.clone());
                        }
                        true
                    }
                    _ => false,
                }
            }
            None => {
                targets.push(Value::Object(fields.clone()));
                true
            }
        },
        _ => false,
    };

    if !applied_to_primary {
        base.insert(PUBLISH_KEY.to_string(), override_value);
    }
}
