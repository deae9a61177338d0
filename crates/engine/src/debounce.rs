//! Keyed debounce for custom validation rules.
//!
//! One pending timer per key: the first call in a window spawns the timer
//! task and registers a broadcast slot; calls arriving before the timer
//! fires overwrite the pending input, push the deadline out by their own
//! delay, and await the same slot instead of scheduling their own timer.
//! The validator runs exactly once, after a full quiet period, with the
//! trailing input, and every waiter resolves from that single execution.
//!
//! Clearing a key (engine reset or destroy) aborts the timer task;
//! waiters observe the closed channel and resolve as `Valid` rather than
//! hanging. See DESIGN.md for the divergence this represents.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use formloom_core::{CustomOutcome, CustomValidator};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct PendingInput {
    value: Value,
    all_values: Value,
    deadline: Instant,
}

struct PendingEntry {
    input: Arc<Mutex<PendingInput>>,
    outcome: watch::Receiver<Option<CustomOutcome>>,
    timer: JoinHandle<()>,
}

type EntryMap = HashMap<String, PendingEntry>;

/// Shared debounce registry. One instance per validation engine.
pub struct Debouncer {
    entries: Arc<Mutex<EntryMap>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Debouncer {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `validator` for `key` after `delay`, coalescing with any
    /// window already pending for that key.
    pub async fn run(
        &self,
        key: &str,
        delay: Duration,
        validator: Arc<dyn CustomValidator>,
        value: Value,
        all_values: Value,
    ) -> CustomOutcome {
        let mut outcome = {
            let mut entries = self.entries.lock().expect("debounce registry poisoned");
            match entries.get(key) {
                Some(entry) => {
                    // attach to the pending window: newest input wins and
                    // the quiet period restarts
                    let mut input = entry.input.lock().expect("debounce input poisoned");
                    input.value = value;
                    input.all_values = all_values;
                    input.deadline = Instant::now() + delay;
                    entry.outcome.clone()
                }
                None => {
                    let (entry, receiver) =
                        self.start_window(key.to_string(), delay, validator, value, all_values);
                    entries.insert(key.to_string(), entry);
                    receiver
                }
            }
        };

        let resolved = match outcome.wait_for(|resolved| resolved.is_some()).await {
            Ok(resolved) => resolved.clone(),
            // window was cleared while waiting
            Err(_) => None,
        };
        resolved.unwrap_or(CustomOutcome::Valid)
    }

    fn start_window(
        &self,
        key: String,
        delay: Duration,
        validator: Arc<dyn CustomValidator>,
        value: Value,
        all_values: Value,
    ) -> (PendingEntry, watch::Receiver<Option<CustomOutcome>>) {
        let input = Arc::new(Mutex::new(PendingInput {
            value,
            all_values,
            deadline: Instant::now() + delay,
        }));
        let (sender, receiver) = watch::channel(None);

        let task_input = Arc::clone(&input);
        let registry = Arc::clone(&self.entries);
        let timer = tokio::spawn(async move {
            // re-check after every wakeup: an attached call may have
            // pushed the deadline out while we slept
            loop {
                let deadline = {
                    let input = task_input.lock().expect("debounce input poisoned");
                    input.deadline
                };
                if Instant::now() >= deadline {
                    break;
                }
                tokio::time::sleep_until(deadline).await;
            }

            // close the window before the (possibly slow) validator runs,
            // so late calls start a fresh one
            registry
                .lock()
                .expect("debounce registry poisoned")
                .remove(&key);

            let (value, all_values) = {
                let input = task_input.lock().expect("debounce input poisoned");
                (input.value.clone(), input.all_values.clone())
            };
            let resolved = validator.validate(&value, &all_values).await;
            let _ = sender.send(Some(resolved));
        });

        let entry = PendingEntry {
            input,
            outcome: receiver.clone(),
            timer,
        };
        (entry, receiver)
    }

    /// Abort every pending window.
    pub fn clear_all(&self) {
        let drained: Vec<PendingEntry> = {
            let mut entries = self.entries.lock().expect("debounce registry poisoned");
            entries.drain().map(|(_, entry)| entry).collect()
        };
        for entry in drained {
            entry.timer.abort();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.clear_all();
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingValidator {
        calls: AtomicUsize,
        seen: Mutex<Vec<Value>>,
    }

    impl CountingValidator {
        fn new() -> Arc<Self> {
            Arc::new(CountingValidator {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CustomValidator for CountingValidator {
        async fn validate(&self, value: &Value, _all_values: &Value) -> CustomOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(value.clone());
            CustomOutcome::Valid
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_calls_coalesce_into_one_trailing_execution() {
        let debouncer = Debouncer::new();
        let validator = CountingValidator::new();

        let runs = (0..5).map(|n| {
            debouncer.run(
                "username-custom",
                Duration::from_millis(300),
                validator.clone() as Arc<dyn CustomValidator>,
                json!(format!("attempt-{n}")),
                json!({}),
            )
        });
        let outcomes = futures::future::join_all(runs).await;

        assert_eq!(validator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*validator.seen.lock().unwrap(), vec![json!("attempt-4")]);
        assert!(outcomes.iter().all(|o| *o == CustomOutcome::Valid));
    }

    #[tokio::test(start_paused = true)]
    async fn a_call_inside_the_window_restarts_the_quiet_period() {
        let debouncer = Debouncer::new();
        let validator = CountingValidator::new();

        let first = debouncer.run(
            "email-custom",
            Duration::from_millis(300),
            validator.clone() as Arc<dyn CustomValidator>,
            json!("early"),
            json!({}),
        );
        let second = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            debouncer
                .run(
                    "email-custom",
                    Duration::from_millis(300),
                    validator.clone() as Arc<dyn CustomValidator>,
                    json!("late"),
                    json!({}),
                )
                .await
        };
        // the second call lands at 200ms, so nothing may fire at the
        // original 300ms deadline; only at 500ms
        let quiet_check = async {
            tokio::time::sleep(Duration::from_millis(400)).await;
            assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
        };

        futures::future::join3(first, second, quiet_check).await;

        assert_eq!(validator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*validator.seen.lock().unwrap(), vec![json!("late")]);
    }

    #[tokio::test(start_paused = true)]
    async fn windows_after_the_timer_fires_are_independent() {
        let debouncer = Debouncer::new();
        let validator = CountingValidator::new();

        let first = debouncer
            .run(
                "code-custom",
                Duration::from_millis(100),
                validator.clone() as Arc<dyn CustomValidator>,
                json!("first"),
                json!({}),
            )
            .await;
        let second = debouncer
            .run(
                "code-custom",
                Duration::from_millis(100),
                validator.clone() as Arc<dyn CustomValidator>,
                json!("second"),
                json!({}),
            )
            .await;

        assert_eq!(first, CustomOutcome::Valid);
        assert_eq!(second, CustomOutcome::Valid);
        assert_eq!(validator.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *validator.seen.lock().unwrap(),
            vec![json!("first"), json!("second")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_keys_do_not_share_windows() {
        let debouncer = Debouncer::new();
        let validator = CountingValidator::new();

        let a = debouncer.run(
            "a-custom",
            Duration::from_millis(50),
            validator.clone() as Arc<dyn CustomValidator>,
            json!("a"),
            json!({}),
        );
        let b = debouncer.run(
            "b-custom",
            Duration::from_millis(50),
            validator.clone() as Arc<dyn CustomValidator>,
            json!("b"),
            json!({}),
        );
        futures::future::join(a, b).await;

        assert_eq!(validator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_resolves_waiters_without_running_the_validator() {
        let debouncer = Debouncer::new();
        let validator = CountingValidator::new();

        let waiter = debouncer.run(
            "name-custom",
            Duration::from_secs(60),
            validator.clone() as Arc<dyn CustomValidator>,
            json!("pending"),
            json!({}),
        );
        let canceller = async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            debouncer.clear_all();
        };

        let (outcome, ()) = futures::future::join(waiter, canceller).await;
        assert_eq!(outcome, CustomOutcome::Valid);
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }
}
