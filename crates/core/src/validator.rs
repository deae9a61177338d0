//! Custom validator trait and adapters.
//!
//! A `CustomValidator` asynchronously checks one field's value against the
//! full value snapshot. The outcome mirrors the wire protocol of the rule:
//! valid, invalid with a generic message, or invalid with a specific one.

use async_trait::async_trait;
use serde_json::Value;

/// Result of a custom validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomOutcome {
    /// The value passed.
    Valid,
    /// The value failed; the engine supplies a generic message.
    Invalid,
    /// The value failed with this specific message.
    Message(String),
}

/// Asynchronous user-supplied validation rule.
///
/// Implementations may perform I/O (availability checks against an API,
/// for example); the engine awaits them at a defined suspension point and
/// optionally coalesces rapid calls through a keyed debounce window.
#[async_trait]
pub trait CustomValidator: Send + Sync {
    /// Check `value` in the context of the full value snapshot.
    async fn validate(&self, value: &Value, all_values: &Value) -> CustomOutcome;
}

/// Adapter turning a synchronous closure into a `CustomValidator`.
///
/// Useful for rules that need no I/O and for tests.
pub struct FnValidator<F>(F);

impl<F> FnValidator<F>
where
    F: Fn(&Value, &Value) -> CustomOutcome + Send + Sync,
{
    pub fn new(check: F) -> Self {
        Self(check)
    }
}

#[async_trait]
impl<F> CustomValidator for FnValidator<F>
where
    F: Fn(&Value, &Value) -> CustomOutcome + Send + Sync,
{
    async fn validate(&self, value: &Value, all_values: &Value) -> CustomOutcome {
        (self.0)(value, all_values)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn fn_validator_runs_closure() {
        let validator = FnValidator::new(|value: &Value, all: &Value| {
            if value == &all["expected"] {
                CustomOutcome::Valid
            } else {
                CustomOutcome::Message("unexpected value".to_string())
            }
        });

        let all = json!({"expected": "yes"});
        assert_eq!(validator.validate(&json!("yes"), &all).await, CustomOutcome::Valid);
        assert_eq!(
            validator.validate(&json!("no"), &all).await,
            CustomOutcome::Message("unexpected value".to_string())
        );
    }
}
