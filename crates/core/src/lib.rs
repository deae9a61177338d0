//! formloom-core: schema model for the formloom form engine.
//!
//! Provides the static description a form engine instance is built from:
//! field configurations with typed validation rule sets, conditional
//! predicates, dependency declarations, and the traits the live engine
//! calls back into (`Condition`, `CustomValidator`, `FormHandler`).
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`FormSchema`] -- ordered field map plus lifecycle handler
//! - [`FieldConfig`] / [`FieldValidation`] -- per-field static description
//! - [`Condition`] -- visibility/enablement predicate abstraction
//! - [`CustomValidator`] -- async user-supplied validation rule
//! - [`FormHandler`] -- submit/error/change lifecycle hooks
//!
//! The `path`, `deps`, and `patterns` modules hold the leaf utilities the
//! engine composes: dot-path access into nested values, dependency
//! resolution, and the named pattern registry.

pub mod condition;
pub mod deps;
pub mod field;
pub mod handler;
pub mod path;
pub mod patterns;
pub mod schema;
pub mod validator;

// ── Convenience re-exports: key types ────────────────────────────────

pub use condition::{try_when, when, Condition, ConditionError, ConditionKind};
pub use field::{FieldConfig, FieldType, FieldValidation, Pattern};
pub use handler::{FormHandler, NoopHandler, SubmitError};
pub use patterns::{password_strength, PasswordStrength};
pub use schema::{FormSchema, ValidationMode};
pub use validator::{CustomOutcome, CustomValidator, FnValidator};
