//! Debounced search dispatch.
//!
//! Keystrokes arrive faster than searches complete. The dispatcher clears the
//! caller's results immediately, then debounces the search itself: the first
//! call of a burst runs at once, later calls within the wait window collapse
//! into a single trailing run with the newest parameters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::geocoding::Geocoder;

use super::context::SearchContext;
use super::pipeline::{SearchRequest, SearchResultBatch, get_search_results};
use super::rank::{DefaultRanker, Ranker};

/// Debounce window between keystrokes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Receives `None` when a search starts and `Some(batch)` when one completes.
pub type SearchCallback = Arc<dyn Fn(Option<SearchResultBatch>) + Send + Sync>;

type Job = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct DebounceState {
    timer: Option<JoinHandle<()>>,
    pending: Option<Job>,
    /// Bumped on every call so a stale timer can tell it was superseded.
    epoch: u64,
}

/// Leading and trailing edge debouncer.
///
/// Must be called from within a tokio runtime.
pub struct Debouncer {
    wait: Duration,
    state: Arc<Mutex<DebounceState>>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            state: Arc::default(),
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Run `job` now if no burst is in progress, else schedule it for the end
    /// of the burst, replacing any job already scheduled.
    pub fn call(&self, job: Job) {
        let mut state = lock(&self.state);

        let leading = state.timer.is_none();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.epoch += 1;
        let epoch = state.epoch;

        let run_now = if leading {
            state.pending = None;
            Some(job)
        } else {
            state.pending = Some(job);
            None
        };

        let shared = Arc::clone(&self.state);
        let wait = self.wait;
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;

            let job = {
                let mut state = lock(&shared);
                if state.epoch != epoch {
                    return;
                }
                state.timer = None;
                state.pending.take()
            };

            if let Some(job) = job {
                trace!("debounce trailing edge");
                job();
            }
        }));
        drop(state);

        if let Some(job) = run_now {
            trace!("debounce leading edge");
            job();
        }
    }

    /// Drop any scheduled job and end the current burst.
    pub fn cancel(&self) {
        let mut state = lock(&self.state);
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.pending = None;
        state.epoch += 1;
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(state: &Mutex<DebounceState>) -> MutexGuard<'_, DebounceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Entry point for autosuggest searches.
///
/// Searches run one at a time in dispatch order, and every delivered batch
/// carries a generation number higher than the one before.
pub struct SearchDispatcher<G, R = DefaultRanker> {
    geocoder: Arc<G>,
    ranker: Arc<R>,
    debouncer: Debouncer,
    run_lock: Arc<tokio::sync::Mutex<()>>,
    generation: Arc<AtomicU64>,
}

impl<G: Geocoder + 'static> SearchDispatcher<G> {
    /// A dispatcher with the default ranking and debounce window.
    pub fn new(geocoder: Arc<G>) -> Self {
        Self {
            geocoder,
            ranker: Arc::new(DefaultRanker),
            debouncer: Debouncer::new(DEFAULT_DEBOUNCE),
            run_lock: Arc::default(),
            generation: Arc::default(),
        }
    }
}

impl<G, R> SearchDispatcher<G, R>
where
    G: Geocoder + 'static,
    R: Ranker + 'static,
{
    pub fn with_ranker<R2: Ranker + 'static>(self, ranker: R2) -> SearchDispatcher<G, R2> {
        SearchDispatcher {
            geocoder: self.geocoder.clone(),
            ranker: Arc::new(ranker),
            debouncer: Debouncer::new(self.debouncer.wait()),
            run_lock: self.run_lock.clone(),
            generation: self.generation.clone(),
        }
    }

    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.debouncer = Debouncer::new(wait);
        self
    }

    /// Number of batches delivered so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a search for `request`.
    ///
    /// `callback(None)` is invoked before this returns. The search itself is
    /// debounced; each run that survives invokes `callback(Some(batch))`
    /// exactly once, from a tokio task.
    pub fn execute_search<C>(&self, context: Arc<C>, request: SearchRequest, callback: SearchCallback)
    where
        C: SearchContext + 'static,
    {
        callback(None);

        let geocoder = Arc::clone(&self.geocoder);
        let ranker = Arc::clone(&self.ranker);
        let run_lock = Arc::clone(&self.run_lock);
        let generation = Arc::clone(&self.generation);

        self.debouncer.call(Box::new(move || {
            tokio::spawn(async move {
                let _running = run_lock.lock().await;

                let mut batch =
                    get_search_results(context.as_ref(), geocoder.as_ref(), ranker.as_ref(), &request).await;
                batch.generation = generation.fetch_add(1, Ordering::SeqCst) + 1;

                debug!(
                    term = %batch.term,
                    results = batch.results.len(),
                    generation = batch.generation,
                    "delivering search results"
                );
                callback(Some(batch));
            });
        }));
    }

    /// Drop a search scheduled for the end of the current burst.
    pub fn cancel_pending(&self) {
        self.debouncer.cancel();
    }
}
