//! RFC 7396 JSON Merge Patch, used to layer the local file over the global one.

use serde_json::Value;

/// Apply `patch` to `target`.
///
/// Objects merge key by key, `null` removes a key, anything else replaces.
///
/// ```
/// use serde_json::json;
/// use never_give_up_config::merge::merge_patch;
///
/// let global = json!({"sampling": {"enabled": true, "max_tokens": 512}});
/// let local = json!({"sampling": {"max_tokens": 256}, "logging": {"json": true}});
/// assert_eq!(
///     merge_patch(global, local),
///     json!({"sampling": {"enabled": true, "max_tokens": 256}, "logging": {"json": true}})
/// );
/// ```
pub fn merge_patch(target: Value, patch: Value) -> Value {
    let Value::Object(patch_map) = patch else {
        return patch;
    };
    let mut target_map = match target {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    for (key, value) in patch_map {
        if value.is_null() {
            target_map.remove(&key);
        } else {
            let existing = target_map.remove(&key).unwrap_or(Value::Null);
            target_map.insert(key, merge_patch(existing, value));
        }
    }
    Value::Object(target_map)
}
