//! Form schema: the declaration-ordered field map plus lifecycle handler.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::field::FieldConfig;
use crate::handler::FormHandler;

/// When field validation runs automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Validate a field on every committed value change.
    OnChange,
    /// Validate a field when it loses focus.
    OnBlur,
    /// Validate only on submit.
    #[default]
    OnSubmit,
}

/// Read-only input to one engine instance.
///
/// Field iteration order is declaration order. Re-supplying a new schema
/// requires destroying and reconstructing the engine.
#[derive(Clone)]
pub struct FormSchema {
    pub mode: ValidationMode,
    pub fields: IndexMap<String, FieldConfig>,
    pub handler: Arc<dyn FormHandler>,
}

impl FormSchema {
    pub fn new(handler: Arc<dyn FormHandler>) -> Self {
        FormSchema {
            mode: ValidationMode::default(),
            fields: IndexMap::new(),
            handler,
        }
    }

    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn field(mut self, name: impl Into<String>, config: FieldConfig) -> Self {
        self.fields.insert(name.into(), config);
        self
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use crate::handler::NoopHandler;

    #[test]
    fn fields_keep_declaration_order() {
        let schema = FormSchema::new(Arc::new(NoopHandler))
            .field("zulu", FieldConfig::new(FieldType::Text))
            .field("alpha", FieldConfig::new(FieldType::Text))
            .field("mike", FieldConfig::new(FieldType::Text));

        let names: Vec<&str> = schema.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn default_mode_is_on_submit() {
        let schema = FormSchema::new(Arc::new(NoopHandler));
        assert_eq!(schema.mode, ValidationMode::OnSubmit);
    }
}
