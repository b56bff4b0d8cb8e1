//! Debounced anchor regeneration for an editing session.
//!
//! Every title edit schedules two independent tasks for the edited node:
//!
//! - the debounced regeneration, run after a quiet period
//! - a safety ceiling that clears the "regenerating" state even if the
//!   regeneration never completes
//!
//! A newer edit of the same node cancels both and schedules fresh ones, so
//! only the last title typed is ever turned into an anchor. Each schedule
//! carries a generation number; a task whose generation is no longer
//! current does nothing even if cancellation came too late to stop it.
//!
//! Locks are always taken document first, then session state. Title writes
//! and generation bumps happen under both, so a regeneration that checked
//! its generation cannot see a newer title.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tessera_content::Document;
use tokio::sync::broadcast;

use crate::schedule::{CancelHandle, Scheduler, TokioScheduler};
use crate::{AnchorChange, AnchorError, regenerate};

/// Default quiet period before regenerating.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
/// Default ceiling on the "regenerating" state.
pub const DEFAULT_SAFETY_CEILING: Duration = Duration::from_secs(5);

const EVENT_CAPACITY: usize = 64;

/// Timing of automatic regeneration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorTiming {
    pub debounce: Duration,
    pub safety_ceiling: Duration,
}

impl Default for AnchorTiming {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            safety_ceiling: DEFAULT_SAFETY_CEILING,
        }
    }
}

impl AnchorTiming {
    /// The ceiling must outlast the debounce, or it would time out every
    /// regeneration before it runs.
    pub fn validate(&self) -> Result<(), AnchorError> {
        if self.safety_ceiling <= self.debounce {
            return Err(AnchorError::InvalidTiming {
                debounce: self.debounce,
                safety_ceiling: self.safety_ceiling,
            });
        }
        Ok(())
    }
}

/// Notification sent to session subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnchorEvent {
    /// A title edit scheduled regeneration.
    Scheduled { key: String },
    /// Regeneration finished.
    Regenerated { key: String, change: AnchorChange },
    /// Regeneration failed; the previous anchor is kept.
    Failed { key: String, error: AnchorError },
    /// The safety ceiling fired before regeneration finished. The
    /// regeneration itself may still complete later.
    TimedOut { key: String },
}

struct Pending {
    generation: u64,
    /// Cleared by the safety ceiling; the debounce task stays scheduled.
    in_progress: bool,
    debounce: Option<CancelHandle>,
    ceiling: Option<CancelHandle>,
}

impl Pending {
    fn cancel(self) {
        if let Some(handle) = self.debounce {
            handle.cancel();
        }
        if let Some(handle) = self.ceiling {
            handle.cancel();
        }
    }
}

#[derive(Default)]
struct State {
    next_generation: u64,
    pending: HashMap<String, Pending>,
    errors: HashMap<String, AnchorError>,
}

impl State {
    fn current(&mut self, key: &str, generation: u64) -> Option<&mut Pending> {
        self.pending
            .get_mut(key)
            .filter(|p| p.generation == generation)
    }
}

struct Inner {
    document: Arc<Mutex<Document>>,
    state: Mutex<State>,
    events: broadcast::Sender<AnchorEvent>,
}

impl Inner {
    fn run_regeneration(&self, key: &str, generation: u64) {
        let mut document = self.document.lock().unwrap();
        let mut state = self.state.lock().unwrap();
        if state.current(key, generation).is_none() {
            // Superseded; the newer task decides.
            return;
        }

        let result = regenerate(&mut document, key);
        drop(document);

        if let Some(mut pending) = state.pending.remove(key) {
            pending.debounce = None;
            pending.cancel();
        }
        self.record(&mut state, key, result);
    }

    fn force_idle(&self, key: &str, generation: u64) {
        let mut state = self.state.lock().unwrap();
        let Some(pending) = state
            .current(key, generation)
            .filter(|p| p.in_progress)
        else {
            return;
        };
        pending.in_progress = false;
        pending.ceiling = None;
        drop(state);

        tracing::warn!(key, "Anchor regeneration did not finish before the safety ceiling");
        self.send(AnchorEvent::TimedOut {
            key: key.to_owned(),
        });
    }

    fn record(&self, state: &mut State, key: &str, result: Result<AnchorChange, AnchorError>) {
        match result {
            Ok(change) => {
                state.errors.remove(key);
                tracing::debug!(key, change = ?change, "Anchor regenerated");
                self.send(AnchorEvent::Regenerated {
                    key: key.to_owned(),
                    change,
                });
            }
            Err(error) => {
                tracing::warn!(key, error = %error, "Anchor regeneration failed");
                state.errors.insert(key.to_owned(), error.clone());
                self.send(AnchorEvent::Failed {
                    key: key.to_owned(),
                    error,
                });
            }
        }
    }

    fn send(&self, event: AnchorEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Anchor bookkeeping for one editing session over a shared document.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// use tessera_anchor::{AnchorSession, AnchorTiming};
/// use tessera_content::Document;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let doc = Document::from_json(r#"[{"_key": "s1", "_type": "section"}]"#).unwrap();
/// let doc = Arc::new(Mutex::new(doc));
/// let session = AnchorSession::new(Arc::clone(&doc), AnchorTiming::default()).unwrap();
///
/// session.title_changed("s1", "Our Team").unwrap();
/// assert!(session.is_regenerating("s1"));
///
/// tokio::time::sleep(Duration::from_millis(600)).await;
/// let anchor = doc.lock().unwrap().find("s1").and_then(|n| n.anchor_id().map(str::to_owned));
/// assert_eq!(anchor.as_deref(), Some("our-team"));
/// # }
/// ```
pub struct AnchorSession<S: Scheduler = TokioScheduler> {
    inner: Arc<Inner>,
    scheduler: S,
    timing: AnchorTiming,
}

impl AnchorSession<TokioScheduler> {
    /// Session scheduling on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(document: Arc<Mutex<Document>>, timing: AnchorTiming) -> Result<Self, AnchorError> {
        Self::with_scheduler(document, TokioScheduler::current(), timing)
    }
}

impl<S: Scheduler> AnchorSession<S> {
    /// Fails when `timing` has a safety ceiling no longer than the debounce.
    pub fn with_scheduler(
        document: Arc<Mutex<Document>>,
        scheduler: S,
        timing: AnchorTiming,
    ) -> Result<Self, AnchorError> {
        timing.validate()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            inner: Arc::new(Inner {
                document,
                state: Mutex::new(State::default()),
                events,
            }),
            scheduler,
            timing,
        })
    }

    /// The shared document.
    #[must_use]
    pub fn document(&self) -> Arc<Mutex<Document>> {
        Arc::clone(&self.inner.document)
    }

    #[must_use]
    pub fn timing(&self) -> AnchorTiming {
        self.timing
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AnchorEvent> {
        self.inner.events.subscribe()
    }

    /// Store a new title and schedule regeneration of the node's anchor.
    ///
    /// An empty title clears the anchor once the debounce elapses.
    pub fn title_changed(&self, key: &str, title: &str) -> Result<(), AnchorError> {
        let generation = {
            let mut document = self.inner.document.lock().unwrap();
            let node = document
                .find_mut(key)
                .filter(|_| !key.is_empty())
                .ok_or_else(|| AnchorError::NotFound(key.to_owned()))?;
            let title = (!title.is_empty()).then(|| title.to_owned());
            if !node.set_title(title) {
                return Err(AnchorError::NoTitle(key.to_owned()));
            }

            let mut state = self.inner.state.lock().unwrap();
            state.next_generation += 1;
            let generation = state.next_generation;
            let previous = state.pending.insert(
                key.to_owned(),
                Pending {
                    generation,
                    in_progress: true,
                    debounce: None,
                    ceiling: None,
                },
            );
            if let Some(previous) = previous {
                previous.cancel();
            }
            generation
        };

        let debounce = self.schedule(self.timing.debounce, key, generation, Inner::run_regeneration);
        let ceiling = self.schedule(self.timing.safety_ceiling, key, generation, Inner::force_idle);

        let mut state = self.inner.state.lock().unwrap();
        match state.current(key, generation) {
            Some(pending) => {
                pending.debounce = Some(debounce);
                pending.ceiling = Some(ceiling);
            }
            None => {
                debounce.cancel();
                ceiling.cancel();
            }
        }
        drop(state);

        tracing::debug!(key, generation, "Scheduled anchor regeneration");
        self.inner.send(AnchorEvent::Scheduled {
            key: key.to_owned(),
        });
        Ok(())
    }

    fn schedule(
        &self,
        delay: Duration,
        key: &str,
        generation: u64,
        run: fn(&Inner, &str, u64),
    ) -> CancelHandle {
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let key = key.to_owned();
        self.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    run(&inner, &key, generation);
                }
            }),
        )
    }

    /// Regenerate immediately, cancelling any pending automatic run.
    pub fn regenerate_now(&self, key: &str) -> Result<AnchorChange, AnchorError> {
        let mut document = self.inner.document.lock().unwrap();
        let mut state = self.inner.state.lock().unwrap();
        if let Some(pending) = state.pending.remove(key) {
            pending.cancel();
        }

        let result = regenerate(&mut document, key);
        drop(document);
        self.inner.record(&mut state, key, result.clone());
        result
    }

    /// Whether regeneration is pending for `key` and the safety ceiling has
    /// not yet fired.
    #[must_use]
    pub fn is_regenerating(&self, key: &str) -> bool {
        self.inner
            .state
            .lock()
            .unwrap()
            .pending
            .get(key)
            .is_some_and(|p| p.in_progress)
    }

    /// Last regeneration error for `key`, cleared by the next success.
    #[must_use]
    pub fn field_error(&self, key: &str) -> Option<AnchorError> {
        self.inner.state.lock().unwrap().errors.get(key).cloned()
    }

    /// Cancel every pending task.
    pub fn shutdown(&self) {
        let pending: Vec<Pending> = self
            .inner
            .state
            .lock()
            .unwrap()
            .pending
            .drain()
            .map(|(_, p)| p)
            .collect();
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "Cancelling pending anchor regenerations");
        }
        for p in pending {
            p.cancel();
        }
    }
}

impl<S: Scheduler> Drop for AnchorSession<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
