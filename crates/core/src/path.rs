//! Dot-path access into nested value mappings.
//!
//! Paths split on `.`; `get` short-circuits to `None` on any missing or
//! non-object segment, `set` creates (or replaces non-object)
//! intermediates. Neither ever signals an error.

use serde_json::{Map, Value};

/// Read the value at `path`, or `None` if any segment is missing.
pub fn get<'a>(values: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = values;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate objects as needed.
/// An intermediate that is not an object is replaced with a fresh one.
pub fn set(values: &mut Value, path: &str, value: Value) {
    let mut current = values;
    let mut remaining = path.split('.').peekable();
    while let Some(segment) = remaining.next() {
        let slot = as_object_slot(current);
        if remaining.peek().is_none() {
            slot.insert(segment.to_string(), value);
            return;
        }
        current = slot
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

fn as_object_slot(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just reset to an object"),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trip_flat_path() {
        let mut values = json!({});
        set(&mut values, "name", json!("ada"));
        assert_eq!(get(&values, "name"), Some(&json!("ada")));
    }

    #[test]
    fn round_trip_creates_intermediates() {
        let mut values = json!({});
        set(&mut values, "profile.address.city", json!("Lisbon"));
        assert_eq!(get(&values, "profile.address.city"), Some(&json!("Lisbon")));
        assert_eq!(
            values,
            json!({"profile": {"address": {"city": "Lisbon"}}})
        );
    }

    #[test]
    fn get_missing_segment_is_none() {
        let values = json!({"profile": {"name": "ada"}});
        assert_eq!(get(&values, "profile.age"), None);
        assert_eq!(get(&values, "settings.theme"), None);
        assert_eq!(get(&values, "profile.name.first"), None);
    }

    #[test]
    fn set_replaces_non_object_intermediate() {
        let mut values = json!({"profile": "oops"});
        set(&mut values, "profile.name", json!("ada"));
        assert_eq!(get(&values, "profile.name"), Some(&json!("ada")));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut values = json!({"count": 1});
        set(&mut values, "count", json!(2));
        assert_eq!(get(&values, "count"), Some(&json!(2)));
    }
}
