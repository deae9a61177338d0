//! Canonical mutable form state and its read-only projections.

use std::collections::{BTreeMap, BTreeSet};

use formloom_core::FieldType;
use serde::Serialize;
use serde_json::{Map, Value};

/// The single mutable state instance owned by the orchestrator.
///
/// Invariant: `is_valid == errors.is_empty()`, recomputed after every
/// mutation that can add or remove an error. The error map may carry
/// entries for untouched fields; display eligibility is gated by
/// `touched` in the field-props projection.
#[derive(Debug, Clone)]
pub struct FormState {
    /// Nested value mapping, dot-path addressed.
    pub values: Value,
    pub errors: BTreeMap<String, String>,
    pub touched: BTreeSet<String>,
    pub is_submitting: bool,
    pub is_valid: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        FormState {
            values: Value::Object(Map::new()),
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            is_submitting: false,
            is_valid: true,
        }
    }

    pub fn recompute_valid(&mut self) {
        self.is_valid = self.errors.is_empty();
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            values: self.values.clone(),
            errors: self.errors.clone(),
            touched: self.touched.clone(),
            is_submitting: self.is_submitting,
            is_valid: self.is_valid,
        }
    }
}

/// Serializable snapshot of the form state, safe for diagnostic display.
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub values: Value,
    pub errors: BTreeMap<String, String>,
    pub touched: BTreeSet<String>,
    pub is_submitting: bool,
    pub is_valid: bool,
}

/// The {visible, disabled, readonly, required} tuple computed from a
/// field's conditional predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedFieldState {
    pub visible: bool,
    pub disabled: bool,
    pub readonly: bool,
    pub required: bool,
}

impl Default for DerivedFieldState {
    fn default() -> Self {
        DerivedFieldState {
            visible: true,
            disabled: false,
            readonly: false,
            required: false,
        }
    }
}

/// Read-only per-field projection: everything the rendering layer needs
/// to draw and wire up one field.
#[derive(Debug, Clone)]
pub struct FieldProps {
    pub name: String,
    pub field_type: FieldType,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    /// Current value; empty string when unset.
    pub value: Value,
    /// The recorded error, only once the field has been touched.
    pub error: Option<String>,
    pub visible: bool,
    pub disabled: bool,
    pub readonly: bool,
    /// Static `required` flag merged with the derived one.
    pub required: bool,
}

impl FieldProps {
    /// Default projection for a name the schema does not declare.
    pub(crate) fn unknown(name: &str) -> Self {
        FieldProps {
            name: name.to_string(),
            field_type: FieldType::default(),
            label: None,
            placeholder: None,
            value: Value::String(String::new()),
            error: None,
            visible: true,
            disabled: false,
            readonly: false,
            required: false,
        }
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
    fn fresh_state_is_valid_and_empty() {
        let state = FormState::new();
        assert_eq!(state.values, json!({}));
        assert!(state.errors.is_empty());
        assert!(state.touched.is_empty());
        assert!(!state.is_submitting);
        assert!(state.is_valid);
    }

    #[test]
    fn validity_tracks_error_map() {
        let mut state = FormState::new();
        state.errors.insert("email".to_string(), "email is required".to_string());
        state.recompute_valid();
        assert!(!state.is_valid);

        state.errors.clear();
        state.recompute_valid();
        assert!(state.is_valid);
    }

    #[test]
    fn snapshot_serializes() {
        let mut state = FormState::new();
        state.values = json!({"profile": {"name": "ada"}});
        state.touched.insert("profile.name".to_string());

        let serialized = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(serialized["values"]["profile"]["name"], "ada");
        assert_eq!(serialized["is_valid"], true);
        assert_eq!(serialized["touched"][0], "profile.name");
    }

    #[test]
    fn derived_state_defaults() {
        let derived = DerivedFieldState::default();
        assert!(derived.visible);
        assert!(!derived.disabled);
        assert!(!derived.readonly);
        assert!(!derived.required);
    }
}
