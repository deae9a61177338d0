//! Conditional evaluation and the per-field derived-state cache.
//!
//! [`evaluate_condition`] is the safe entry point for one predicate: a
//! missing condition yields the kind's default, and a failing one logs a
//! warning and falls back to that same default, so a broken predicate can
//! neither hide an already-visible field nor crash the update cycle.
//!
//! [`FieldLogicCache`] holds the last-computed tuple per field and is the
//! mechanism behind selective recomputation: on every value change each
//! field's config is checked against the dependency resolver, but only
//! true dependents of the changed field do real predicate work.

use std::collections::BTreeMap;

use formloom_core::{deps, ConditionKind, FieldConfig};
use serde_json::Value;

use crate::state::DerivedFieldState;

/// Evaluate one conditional predicate against the current values.
pub fn evaluate_condition(
    field_name: &str,
    config: &FieldConfig,
    values: &Value,
    kind: ConditionKind,
) -> bool {
    let Some(condition) = config.condition(kind) else {
        return kind.fallback();
    };
    match condition.evaluate(values) {
        Ok(result) => result,
        Err(error) => {
            tracing::warn!(
                field = field_name,
                kind = kind.as_str(),
                %error,
                "condition evaluation failed, falling back to default"
            );
            kind.fallback()
        }
    }
}

/// Arena of last-computed derived-state tuples, keyed by field name.
///
/// Lifecycle is tied to the engine: populated at construction, cleared on
/// reset and destroy. A field's entry is only trusted after at least one
/// `update` call for that field.
#[derive(Default)]
pub struct FieldLogicCache {
    states: BTreeMap<String, DerivedFieldState>,
}

impl FieldLogicCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the field's tuple and report whether it changed.
    ///
    /// When `changed_field` is given, fields that do not depend on it are
    /// skipped entirely (a cheap membership check) and report no change.
    /// A field with no cached entry always reports a change.
    pub fn update(
        &mut self,
        field_name: &str,
        config: &FieldConfig,
        values: &Value,
        changed_field: Option<&str>,
    ) -> bool {
        if let Some(changed) = changed_field {
            if !deps::should_update(field_name, changed, config) {
                return false;
            }
        }

        let next = DerivedFieldState {
            visible: evaluate_condition(field_name, config, values, ConditionKind::Visible),
            disabled: evaluate_condition(field_name, config, values, ConditionKind::Disabled),
            readonly: evaluate_condition(field_name, config, values, ConditionKind::Readonly),
            required: evaluate_condition(field_name, config, values, ConditionKind::Required),
        };

        let previous = self.states.insert(field_name.to_string(), next);
        previous != Some(next)
    }

    /// The cached tuple, or defaults if the field was never computed.
    pub fn get(&self, field_name: &str) -> DerivedFieldState {
        self.states.get(field_name).copied().unwrap_or_default()
    }

    pub fn is_visible(&self, field_name: &str) -> bool {
        self.get(field_name).visible
    }

    pub fn is_required(&self, field_name: &str) -> bool {
        self.get(field_name).required
    }

    pub fn reset(&mut self) {
        self.states.clear();
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
