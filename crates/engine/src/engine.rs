//! The form orchestrator.
//!
//! `FormEngine` owns the canonical state and composes the leaf
//! components: every mutation entry point writes through the path
//! accessor, refreshes the derived-state cache against the changed field,
//! optionally triggers validation, and then notifies subscribers
//! synchronously in registration order.

use formloom_core::{path, FieldConfig, FormSchema, ValidationMode};
use futures::future::join_all;
use serde_json::{Map, Value};

use crate::logic::FieldLogicCache;
use crate::state::{FieldProps, FormSnapshot, FormState};
use crate::validation::ValidationEngine;

/// Handle returned by [`FormEngine::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

/// Per-field work item prepared ahead of a validation pass.
enum FieldCheck {
    /// Name the schema does not declare: vacuously valid.
    Unknown,
    /// Invisible fields are never required to pass validation.
    Invisible,
    /// Run the pipeline with these owned inputs.
    Run {
        value: Value,
        config: Box<FieldConfig>,
    },
}

/// Pipeline outcome for one prepared field.
enum CheckOutcome {
    Skipped,
    Cleared,
    Checked(Option<String>),
}

/// The live engine: one instance per supplied schema.
pub struct FormEngine {
    schema: FormSchema,
    state: FormState,
    validation: ValidationEngine,
    logic: FieldLogicCache,
    subscribers: Vec<(SubscriberId, Box<dyn Fn() + Send>)>,
    next_subscriber: u64,
}

impl FormEngine {
    /// Build the engine: defaults applied, derived state computed for
    /// every field.
    pub fn new(schema: FormSchema) -> Self {
        let mut engine = FormEngine {
            state: Self::initial_state(&schema),
            validation: ValidationEngine::new(),
            logic: FieldLogicCache::new(),
            subscribers: Vec::new(),
            next_subscriber: 0,
            schema,
        };
        engine.refresh_logic(None);
        engine
    }

    fn initial_state(schema: &FormSchema) -> FormState {
        let mut state = FormState::new();
        for (name, config) in &schema.fields {
            if let Some(default) = &config.default_value {
                path::set(&mut state.values, name, default.clone());
            }
        }
        state
    }

    /// Refresh every field's derived state. With a changed field, only
    /// its dependents do predicate work.
    fn refresh_logic(&mut self, changed_field: Option<&str>) {
        for (name, config) in &self.schema.fields {
            self.logic
                .update(name, config, &self.state.values, changed_field);
        }
    }

    // ── Subscription ─────────────────────────────────────────────────

    /// Register a callback fired synchronously after every mutation, in
    /// registration order. No payload: subscribers re-read state.
    pub fn subscribe(&mut self, callback: impl Fn() + Send + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(existing, _)| *existing != id);
    }

    fn notify(&self) {
        for (_, callback) in &self.subscribers {
            callback();
        }
    }

    // ── State access ─────────────────────────────────────────────────

    /// Snapshot of the current state, safe to serialize.
    pub fn state(&self) -> FormSnapshot {
        self.state.snapshot()
    }

    /// Read-only projection for one field. Unknown names yield the
    /// default projection.
    pub fn field_props(&self, field_name: &str) -> FieldProps {
        let Some(config) = self.schema.fields.get(field_name) else {
            return FieldProps::unknown(field_name);
        };

        let value = match path::get(&self.state.values, field_name) {
            Some(stored) if !stored.is_null() => stored.clone(),
            _ => Value::String(String::new()),
        };
        let touched = self.state.touched.contains(field_name);
        let error = if touched {
            self.state.errors.get(field_name).cloned()
        } else {
            None
        };
        let derived = self.logic.get(field_name);
        let static_required = config
            .validation
            .as_ref()
            .map(|validation| validation.required)
            .unwrap_or(false);

        FieldProps {
            name: field_name.to_string(),
            field_type: config.field_type,
            label: config.label.clone(),
            placeholder: config.placeholder.clone(),
            value,
            error,
            visible: derived.visible,
            disabled: derived.disabled,
            readonly: derived.readonly,
            required: static_required || derived.required,
        }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Commit a value change. Suspends only when on-change validation
    /// awaits an asynchronous custom rule.
    pub async fn set_value(&mut self, field_name: &str, value: Value) {
        tracing::debug!(field = field_name, "setting value");
        path::set(&mut self.state.values, field_name, value.clone());
        self.refresh_logic(Some(field_name));

        if self.schema.mode == ValidationMode::OnChange {
            self.validate_field(field_name).await;
        }

        self.schema.handler.on_change(field_name, &value);
        self.state.recompute_valid();
        self.notify();
    }

    pub fn set_error(&mut self, field_name: &str, message: impl Into<String>) {
        self.state.errors.insert(field_name.to_string(), message.into());
        self.state.recompute_valid();
        self.notify();
    }

    pub fn clear_error(&mut self, field_name: &str) {
        self.state.errors.remove(field_name);
        self.state.recompute_valid();
        self.notify();
    }

    /// Mark the field touched; validate in on-blur mode.
    pub async fn handle_blur(&mut self, field_name: &str) {
        self.state.touched.insert(field_name.to_string());
        if self.schema.mode == ValidationMode::OnBlur {
            self.validate_field(field_name).await;
        }
        self.notify();
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Merge the static required flag with the derived one so the
    /// pipeline sees a single effective rule set.
    fn effective_config(&self, field_name: &str, config: &FieldConfig) -> FieldConfig {
        let mut effective = config.clone();
        let mut validation = effective.validation.take().unwrap_or_default();
        validation.required = validation.required || self.logic.is_required(field_name);
        effective.validation = Some(validation);
        effective
    }

    fn prepare_check(&self, field_name: &str) -> FieldCheck {
        let Some(config) = self.schema.fields.get(field_name) else {
            return FieldCheck::Unknown;
        };
        if !self.logic.is_visible(field_name) {
            return FieldCheck::Invisible;
        }
        let value = path::get(&self.state.values, field_name)
            .cloned()
            .unwrap_or(Value::Null);
        FieldCheck::Run {
            value,
            config: Box::new(self.effective_config(field_name, config)),
        }
    }

    /// Validate one field, recording or clearing its error. Invisible
    /// fields clear and pass; unknown names pass.
    pub async fn validate_field(&mut self, field_name: &str) -> bool {
        match self.prepare_check(field_name) {
            FieldCheck::Unknown => true,
            FieldCheck::Invisible => {
                self.clear_error(field_name);
                true
            }
            FieldCheck::Run { value, config } => {
                let all_values = self.state.values.clone();
                let error = self
                    .validation
                    .validate(&value, &config, &all_values, field_name)
                    .await;
                match error {
                    Some(message) => {
                        self.set_error(field_name, message);
                        false
                    }
                    None => {
                        self.clear_error(field_name);
                        true
                    }
                }
            }
        }
    }

    /// Fan out validation across every declared field concurrently and
    /// join the results. Updates the error map only; touched flags are
    /// untouched.
    pub async fn validate_form(&mut self) -> bool {
        let prepared: Vec<(String, FieldCheck)> = self
            .schema
            .fields
            .keys()
            .map(|name| (name.clone(), self.prepare_check(name)))
            .collect();
        let all_values = self.state.values.clone();

        let validation = &self.validation;
        let checks = prepared.iter().map(|(name, check)| {
            let all_values = &all_values;
            async move {
                match check {
                    FieldCheck::Unknown => CheckOutcome::Skipped,
                    FieldCheck::Invisible => CheckOutcome::Cleared,
                    FieldCheck::Run { value, config } => CheckOutcome::Checked(
                        validation.validate(value, config, all_values, name).await,
                    ),
                }
            }
        });
        let outcomes = join_all(checks).await;

        let results: Vec<(String, CheckOutcome)> = prepared
            .iter()
            .map(|(name, _)| name.clone())
            .zip(outcomes)
            .collect();

        let mut all_valid = true;
        for (name, outcome) in results {
            match outcome {
                CheckOutcome::Skipped => {}
                CheckOutcome::Cleared => self.clear_error(&name),
                CheckOutcome::Checked(None) => self.clear_error(&name),
                CheckOutcome::Checked(Some(message)) => {
                    self.set_error(&name, message);
                    all_valid = false;
                }
            }
        }

        self.state.recompute_valid();
        all_valid
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Run the submit pipeline: validate everything, then either hand the
    /// error map to `on_error` or the visible-field payload to
    /// `on_submit`. A failing submit handler is logged, never re-thrown.
    /// `is_submitting` returns to false on every path.
    pub async fn handle_submit(&mut self) {
        tracing::debug!("form submission started");
        self.state.is_submitting = true;
        self.notify();

        let is_valid = self.validate_form().await;
        if !is_valid {
            tracing::debug!(errors = ?self.state.errors, "form validation failed");
            self.schema.handler.on_error(&self.state.errors);
        } else {
            let payload = self.visible_payload();
            tracing::debug!("form valid, submitting");
            if let Err(error) = self.schema.handler.on_submit(payload).await {
                tracing::error!(%error, "form submission failed");
            }
        }

        self.state.is_submitting = false;
        self.notify();
    }

    /// Top-level value entries whose field is currently visible. Keys
    /// with no schema entry default to visible.
    fn visible_payload(&self) -> Value {
        let mut payload = Map::new();
        if let Some(entries) = self.state.values.as_object() {
            for (key, value) in entries {
                if self.logic.is_visible(key) {
                    payload.insert(key.clone(), value.clone());
                }
            }
        }
        Value::Object(payload)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Reinitialize to declared defaults: errors, touched flags, derived
    /// state, and pending debounce windows are all cleared.
    pub fn reset(&mut self) {
        tracing::debug!("form reset");
        self.state = Self::initial_state(&self.schema);
        self.logic.reset();
        self.validation.clear_all_debounced();
        self.refresh_logic(None);
        self.notify();
    }

    /// Tear down: subscribers, derived-state cache, and pending debounce
    /// windows are cleared. The instance must not be used afterward.
    pub fn destroy(&mut self) {
        self.subscribers.clear();
        self.logic.reset();
        self.validation.clear_all_debounced();
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
