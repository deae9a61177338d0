//! Field dependency resolution.
//!
//! A field's dependency set is the union of its explicit `field_deps` and
//! the target of its `match_field` rule. The engine consults
//! [`should_update`] on every value change so that only true dependents of
//! the changed field do real predicate work.

use std::collections::BTreeSet;

use crate::field::FieldConfig;

/// The set of field names whose change must trigger recomputation of the
/// given field. Deduplicated.
pub fn dependencies_of(config: &FieldConfig) -> BTreeSet<String> {
    let mut deps: BTreeSet<String> = config.field_deps.iter().cloned().collect();
    if let Some(validation) = &config.validation {
        if let Some(target) = &validation.match_field {
            deps.insert(target.clone());
        }
    }
    deps
}

/// Whether `field_name`'s derived state is stale after `changed_field`
/// changed: true for the field itself and for any declared dependent.
pub fn should_update(field_name: &str, changed_field: &str, config: &FieldConfig) -> bool {
    field_name == changed_field || dependencies_of(config).contains(changed_field)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldType, FieldValidation};

    #[test]
    fn union_of_explicit_deps_and_match_field() {
        let config = FieldConfig {
            field_deps: vec!["country".to_string(), "password".to_string()],
            validation: Some(FieldValidation {
                match_field: Some("password".to_string()),
                ..FieldValidation::default()
            }),
            ..FieldConfig::new(FieldType::Text)
        };

        let deps = dependencies_of(&config);
        assert_eq!(deps.len(), 2);
        assert!(deps.contains("country"));
        assert!(deps.contains("password"));
    }

    #[test]
    fn no_declarations_means_no_dependencies() {
        let config = FieldConfig::new(FieldType::Text);
        assert!(dependencies_of(&config).is_empty());
    }

    #[test]
    fn updates_for_self_and_dependencies_only() {
        let config = FieldConfig {
            field_deps: vec!["country".to_string()],
            ..FieldConfig::new(FieldType::Text)
        };

        assert!(should_update("state", "country", &config));
        assert!(should_update("state", "state", &config));
        assert!(!should_update("state", "email", &config));
    }
}
