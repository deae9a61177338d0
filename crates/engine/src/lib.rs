//! formloom-engine: the live form engine.
//!
//! Turns a [`formloom_core::FormSchema`] into reactive state: current
//! values, validation errors, and derived visibility/enablement flags,
//! with dependency-aware recomputation and an ordered fail-fast
//! validation pipeline (including keyed debounce for asynchronous custom
//! rules).
//!
//! The engine is single-owner: all mutation goes through a
//! [`FormEngine`]'s `&mut self` methods, and the only suspension points
//! are awaited custom validators and the external submit handler.
//! Subscribers are notified synchronously after every mutation and
//! re-read state through [`FormEngine::state`] or
//! [`FormEngine::field_props`].

pub mod debounce;
pub mod engine;
pub mod logic;
pub mod state;
pub mod validation;

pub use engine::{FormEngine, SubscriberId};
pub use logic::FieldLogicCache;
pub use state::{DerivedFieldState, FieldProps, FormSnapshot, FormState};
pub use validation::ValidationEngine;
