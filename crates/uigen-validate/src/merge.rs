//! Overlaying a generated candidate onto the current state
//!
//! Follows JSON merge-patch semantics: objects merge key by key, `null`
//! removes a key, anything else replaces the current value wholesale.

use serde_json::Value;

/// Apply `patch` on top of `current`
#[must_use]
pub fn merge_patch(current: &Value, patch: &Value) -> Value {
    match (current, patch) {
        (Value::Object(current_map), Value::Object(patch_map)) => {
            let mut result = current_map.clone();
            for (key, patch_val) in patch_map {
                if patch_val.is_null() {
                    result.remove(key);
                    continue;
                }
                let merged = match result.get(key) {
                    Some(current_val) => merge_patch(current_val, patch_val),
                    None => strip_nulls(patch_val),
                };
                result.insert(key.clone(), merged);
            }
            Value::Object(result)
        }
        (_, patch_val) => strip_nulls(patch_val),
    }
}

fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn omitted_fields_are_preserved() {
        let current = json!({"value": 10, "max": 100});
        let patch = json!({"styles": {"indicatorColor": "#22C55E"}});
        assert_eq!(
            merge_patch(&current, &patch),
            json!({"value": 10, "max": 100, "styles": {"indicatorColor": "#22C55E"}})
        );
    }

    #[test]
    fn nested_objects_merge() {
        let current = json!({"styles": {"trackColor": "#E5E7EB", "height": 8}});
        let patch = json!({"styles": {"height": 12}});
        assert_eq!(
            merge_patch(&current, &patch),
            json!({"styles": {"trackColor": "#E5E7EB", "height": 12}})
        );
    }

    #[test]
    fn arrays_are_replaced() {
        let current = json!({"options": ["a", "b"]});
        let patch = json!({"options": ["c"]});
        assert_eq!(merge_patch(&current, &patch), json!({"options": ["c"]}));
    }

    #[test]
    fn null_removes_key() {
        let current = json!({"value": "a", "options": ["a"]});
        let patch = json!({"value": null, "extra": {"x": null, "y": 1}});
        assert_eq!(
            merge_patch(&current, &patch),
            json!({"options": ["a"], "extra": {"y": 1}})
        );
    }

    #[test]
    fn non_object_patch_replaces() {
        assert_eq!(merge_patch(&json!({"a": 1}), &json!([1])), json!([1]));
    }
}
