//! Field configuration model.
//!
//! A `FieldConfig` is the immutable static description of one named form
//! field: its type tag, validation rule set, conditional predicates, and
//! explicit dependency declarations. Configs are built with struct-update
//! syntax over [`FieldConfig::new`] and cloned cheaply (conditions and
//! custom validators are shared via `Arc`).

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::condition::{Condition, ConditionKind};
use crate::validator::CustomValidator;

/// Field type tag.
///
/// Opaque to the engine except for `Email`, which enables the
/// `accepted_domains` rule. Everything else only informs the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Email,
    Password,
    Number,
    Tel,
    Url,
    Select,
    Checkbox,
    Radio,
    Switch,
    File,
    Image,
    Date,
    DatetimeLocal,
    Time,
    Otp,
    Button,
    RichText,
    Custom,
}

/// A pattern rule: either a name resolved against the registry in
/// [`crate::patterns`] (falling back to compiling the name as a literal
/// expression), or a precompiled expression.
#[derive(Debug, Clone)]
pub enum Pattern {
    Named(String),
    Literal(Regex),
}

impl Pattern {
    pub fn named(name: impl Into<String>) -> Self {
        Pattern::Named(name.into())
    }

    pub fn literal(expression: Regex) -> Self {
        Pattern::Literal(expression)
    }
}

/// Validation rule set for one field, applied in a fixed fail-fast order.
#[derive(Clone, Default)]
pub struct FieldValidation {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<Pattern>,
    /// Email-type fields only: allow-list of address domains.
    pub accepted_domains: Option<Vec<String>>,
    /// Name of another field whose value must equal this one.
    pub match_field: Option<String>,
    pub custom: Option<Arc<dyn CustomValidator>>,
    /// Debounce window for the custom rule, in milliseconds. Zero or
    /// absent runs the rule inline on every call.
    pub debounce_ms: Option<u64>,
}

/// Static configuration of one named field.
#[derive(Clone)]
pub struct FieldConfig {
    pub field_type: FieldType,
    /// Display label; error messages fall back to the field name.
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub default_value: Option<Value>,
    pub validation: Option<FieldValidation>,
    pub visible_if: Option<Arc<dyn Condition>>,
    pub disabled_if: Option<Arc<dyn Condition>>,
    pub readonly_if: Option<Arc<dyn Condition>>,
    pub required_if: Option<Arc<dyn Condition>>,
    /// Fields whose value change must trigger this field's recomputation,
    /// beyond what `match_field` already implies.
    pub field_deps: Vec<String>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig::new(FieldType::default())
    }
}

impl FieldConfig {
    pub fn new(field_type: FieldType) -> Self {
        FieldConfig {
            field_type,
            label: None,
            placeholder: None,
            default_value: None,
            validation: None,
            visible_if: None,
            disabled_if: None,
            readonly_if: None,
            required_if: None,
            field_deps: Vec::new(),
        }
    }

    /// Label used in error messages: the declared label, or the field name.
    pub fn display_label<'a>(&'a self, field_name: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(field_name)
    }

    pub fn condition(&self, kind: ConditionKind) -> Option<&Arc<dyn Condition>> {
        match kind {
            ConditionKind::Visible => self.visible_if.as_ref(),
            ConditionKind::Disabled => self.disabled_if.as_ref(),
            ConditionKind::Readonly => self.readonly_if.as_ref(),
            ConditionKind::Required => self.required_if.as_ref(),
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::when;

    #[test]
    fn display_label_falls_back_to_field_name() {
        let unlabeled = FieldConfig::new(FieldType::Text);
        assert_eq!(unlabeled.display_label("username"), "username");

        let labeled = FieldConfig {
            label: Some("User name".to_string()),
            ..FieldConfig::new(FieldType::Text)
        };
        assert_eq!(labeled.display_label("username"), "User name");
    }

    #[test]
    fn condition_lookup_by_kind() {
        let config = FieldConfig {
            visible_if: Some(when(|_: &Value| true)),
            ..FieldConfig::new(FieldType::Text)
        };
        assert!(config.condition(ConditionKind::Visible).is_some());
        assert!(config.condition(ConditionKind::Disabled).is_none());
        assert!(config.condition(ConditionKind::Readonly).is_none());
        assert!(config.condition(ConditionKind::Required).is_none());
    }
}
