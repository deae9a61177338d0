//! Ordered, fail-fast validation pipeline.
//!
//! Rules run in a fixed order and stop at the first failure, so a field
//! never reports more than one simultaneous error. Empty optional fields
//! short-circuit to valid before any other rule fires. Message templates
//! are fixed English phrasing per rule kind, prefixed with the field's
//! label (or its name when unlabeled).

use std::sync::Arc;
use std::time::Duration;

use formloom_core::{path, patterns, CustomOutcome, FieldConfig, FieldType, FieldValidation};
use serde_json::Value;

use crate::debounce::Debouncer;

/// Whether a value passes the "present" test: non-null, non-blank string
/// (after trim), non-empty collection.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Runs the rule pipeline for one field's value. Holds the debounce
/// registry for custom asynchronous rules.
pub struct ValidationEngine {
    debouncer: Debouncer,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    pub fn new() -> Self {
        ValidationEngine {
            debouncer: Debouncer::new(),
        }
    }

    /// Validate `value` against the field's rule set, returning the first
    /// failing rule's message or `None` when every rule passes.
    pub async fn validate(
        &self,
        value: &Value,
        config: &FieldConfig,
        all_values: &Value,
        field_name: &str,
    ) -> Option<String> {
        let Some(validation) = &config.validation else {
            return None;
        };
        let label = config.display_label(field_name);

        if validation.required && !is_present(value) {
            return Some(format!("{label} is required"));
        }

        // every later rule is skipped for empty optional fields
        if !is_present(value) && !validation.required {
            return None;
        }

        if let Some(text) = value.as_str() {
            if let Some(error) = check_text(text, validation, label, field_name) {
                return Some(error);
            }
        }

        if let Some(number) = value.as_f64() {
            if let Some(min) = validation.min {
                if number < min {
                    return Some(format!("{label} must be at least {min}"));
                }
            }
            if let Some(max) = validation.max {
                if number > max {
                    return Some(format!("{label} must be no more than {max}"));
                }
            }
        }

        if config.field_type == FieldType::Email {
            if let (Some(domains), Some(address)) = (&validation.accepted_domains, value.as_str())
            {
                let domain = address.split('@').nth(1);
                let accepted = domain.is_some_and(|d| domains.iter().any(|allowed| allowed == d));
                if !accepted {
                    return Some(format!("{label} domain not accepted"));
                }
            }
        }

        if let Some(target) = &validation.match_field {
            let other = path::get(all_values, target).cloned().unwrap_or(Value::Null);
            if *value != other {
                return Some(format!("{label} does not match"));
            }
        }

        if let Some(custom) = &validation.custom {
            let outcome = self
                .run_custom(custom, validation, value, all_values, field_name)
                .await;
            match outcome {
                CustomOutcome::Valid => {}
                CustomOutcome::Message(message) => return Some(message),
                CustomOutcome::Invalid => return Some(format!("{label} is invalid")),
            }
        }

        None
    }

    async fn run_custom(
        &self,
        custom: &Arc<dyn formloom_core::CustomValidator>,
        validation: &FieldValidation,
        value: &Value,
        all_values: &Value,
        field_name: &str,
    ) -> CustomOutcome {
        match validation.debounce_ms {
            Some(window) if window > 0 => {
                self.debouncer
                    .run(
                        &format!("{field_name}-custom"),
                        Duration::from_millis(window),
                        Arc::clone(custom),
                        value.clone(),
                        all_values.clone(),
                    )
                    .await
            }
            _ => custom.validate(value, all_values).await,
        }
    }

    /// Abort every pending debounce window (engine reset/destroy).
    pub fn clear_all_debounced(&self) {
        self.debouncer.clear_all();
    }
}

fn check_text(
    text: &str,
    validation: &FieldValidation,
    label: &str,
    field_name: &str,
) -> Option<String> {
    let length = text.chars().count();

    if let Some(min) = validation.min_length {
        if length < min {
            return Some(format!("{label} must be at least {min} characters"));
        }
    }

    if let Some(max) = validation.max_length {
        if length > max {
            return Some(format!("{label} must be no more than {max} characters"));
        }
    }

    if let Some(pattern) = &validation.pattern {
        match patterns::resolve(pattern) {
            Ok(expression) => {
                if !expression.is_match(text) {
                    return Some(format!("{label} format is invalid"));
                }
            }
            Err(error) => {
                tracing::warn!(
                    field = field_name,
                    %error,
                    "unresolvable validation pattern, rule skipped"
                );
            }
        }
    }

    None
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
