//! Conditional predicate abstraction.
//!
//! The four per-field conditions (`visible_if`, `disabled_if`,
//! `readonly_if`, `required_if`) all share one capability: evaluate a
//! boolean against the current value snapshot. Plain closures implement
//! [`Condition`] directly; fallible predicates wrap a `Result`-returning
//! closure via [`try_when`].

use std::sync::Arc;

use serde_json::Value;

/// A conditional predicate raised an error while evaluating.
///
/// Never fatal: the engine logs the failure and falls back to the
/// condition kind's default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("condition evaluation failed: {0}")]
pub struct ConditionError(pub String);

/// A boolean predicate over the current form values.
pub trait Condition: Send + Sync {
    fn evaluate(&self, values: &Value) -> Result<bool, ConditionError>;
}

impl<F> Condition for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn evaluate(&self, values: &Value) -> Result<bool, ConditionError> {
        Ok(self(values))
    }
}

/// Wrap an infallible closure as a shared condition.
pub fn when<F>(predicate: F) -> Arc<dyn Condition>
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Arc::new(predicate)
}

struct FallibleFn<F>(F);

impl<F> Condition for FallibleFn<F>
where
    F: Fn(&Value) -> Result<bool, ConditionError> + Send + Sync,
{
    fn evaluate(&self, values: &Value) -> Result<bool, ConditionError> {
        (self.0)(values)
    }
}

/// Wrap a fallible closure as a shared condition.
pub fn try_when<F>(predicate: F) -> Arc<dyn Condition>
where
    F: Fn(&Value) -> Result<bool, ConditionError> + Send + Sync + 'static,
{
    Arc::new(FallibleFn(predicate))
}

/// Which of the four per-field conditions is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Visible,
    Disabled,
    Readonly,
    Required,
}

impl ConditionKind {
    /// Default when a field declares no condition of this kind, and the
    /// fallback when a declared condition fails: fields are visible,
    /// enabled, writable, and not dynamically required.
    pub fn fallback(self) -> bool {
        matches!(self, ConditionKind::Visible)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConditionKind::Visible => "visible_if",
            ConditionKind::Disabled => "disabled_if",
            ConditionKind::Readonly => "readonly_if",
            ConditionKind::Required => "required_if",
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
