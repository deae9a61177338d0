//! Form lifecycle hooks.
//!
//! The rendering layer supplies a `FormHandler` with the schema; the
//! engine calls back into it on every committed value change, on failed
//! submission, and on successful submission.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

/// The submit handler failed.
///
/// Caught at the orchestrator boundary and logged; never surfaced to
/// `on_error`, which receives validation failures only.
#[derive(Debug, Clone, thiserror::Error)]
#[error("submit handler error: {0}")]
pub struct SubmitError(pub String);

/// Lifecycle hooks invoked by the engine.
#[async_trait]
pub trait FormHandler: Send + Sync {
    /// Called with the visible-field payload after a fully valid submit.
    /// Awaited if asynchronous.
    async fn on_submit(&self, data: Value) -> Result<(), SubmitError>;

    /// Called with the full error map when submission fails validation.
    fn on_error(&self, _errors: &BTreeMap<String, String>) {}

    /// Called after every committed value change.
    fn on_change(&self, _field: &str, _value: &Value) {}
}

/// A handler that accepts every submission and ignores every hook.
pub struct NoopHandler;

#[async_trait]
impl FormHandler for NoopHandler {
    async fn on_submit(&self, _data: Value) -> Result<(), SubmitError> {
        Ok(())
    }
}
