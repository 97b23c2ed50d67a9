//! List state controller.
//!
//! Owns the movie collection, the sort criterion and the scroll offset, and
//! drives fetch → parse → publish. All mutation happens through `&mut self`
//! on the owner's context: the background fetch task only produces a
//! `Completion` payload that travels back over a channel and is applied by
//! [`ListController::next_event`] or [`ListController::poll_event`].
//!
//! At most one fetch is in flight. A request for a different criterion while
//! loading aborts the running task and replaces it; every task is tagged with
//! a generation number so a result that slips through from a replaced task is
//! discarded on delivery.

use crate::core::parser::{self, ImageSettings};
use crate::core::snapshot::Snapshot;
use crate::domain::model::{ListState, Movie, SortCriterion};
use crate::domain::ports::{ConnectivityProbe, MovieSource};
use crate::utils::error::{FailureReason, MovieError, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Error(FailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A fetch task was spawned.
    Started,
    /// A fetch for another criterion was aborted and replaced.
    Replaced,
    /// Same criterion as the loaded or loading one; nothing happened.
    Ignored,
    /// Connectivity precondition failed; the collection was cleared.
    Offline,
}

/// What the UI layer is told after a fetch settles.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Loaded {
        criterion: SortCriterion,
        count: usize,
    },
    Failed {
        criterion: SortCriterion,
        reason: FailureReason,
        message: String,
    },
}

/// Host view lifecycle, delivered as discrete signals.
#[derive(Debug, Clone)]
pub enum Lifecycle {
    Create(Option<Snapshot>),
    Restart,
    SaveState,
    Destroy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleOutcome {
    Restored,
    Requested(RequestOutcome),
    Saved(Snapshot),
    Unchanged,
    Destroyed,
}

struct Completion {
    generation: u64,
    criterion: SortCriterion,
    outcome: Result<Vec<Movie>>,
}

struct InFlight {
    generation: u64,
    criterion: SortCriterion,
    task: JoinHandle<()>,
}

enum Wake {
    Delivered(Option<Completion>),
    TaskEnded,
}

async fn fetch_movies<S: MovieSource + ?Sized>(
    source: &S,
    criterion: SortCriterion,
    images: &ImageSettings,
) -> Result<Vec<Movie>> {
    let url = source.build_request_url(criterion)?;
    let body = source.fetch(&url).await?;
    let movies = parser::parse(&body, images)?;
    if movies.is_empty() {
        return Err(MovieError::EmptyResult);
    }
    Ok(movies)
}

pub struct ListController<S, N> {
    source: Arc<S>,
    connectivity: N,
    images: ImageSettings,
    state: ListState,
    load_state: LoadState,
    last_error: Option<String>,
    in_flight: Option<InFlight>,
    generation: u64,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    destroyed: bool,
}

impl<S, N> ListController<S, N>
where
    S: MovieSource + 'static,
    N: ConnectivityProbe,
{
    pub fn new(source: S, connectivity: N, images: ImageSettings) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            connectivity,
            images,
            state: ListState::default(),
            load_state: LoadState::Idle,
            last_error: None,
            in_flight: None,
            generation: 0,
            completions_tx,
            completions_rx,
            destroyed: false,
        }
    }

    /// Criterion used by a fresh start; ignored once a snapshot is restored.
    pub fn with_criterion(mut self, criterion: SortCriterion) -> Self {
        self.state.criterion = criterion;
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn movies(&self) -> &[Movie] {
        self.state.movies()
    }

    pub fn criterion(&self) -> SortCriterion {
        self.state.criterion
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// User-visible message for the last failure, cleared by the next successful load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.state.scroll_offset = offset;
    }

    /// The movie at `index`, by value, for handing to the detail view.
    pub fn select(&self, index: usize) -> Option<Movie> {
        self.movies().get(index).cloned()
    }

    pub fn request_list(&mut self, criterion: SortCriterion) -> RequestOutcome {
        if self.destroyed {
            tracing::debug!("Ignoring request for {} after destroy", criterion);
            return RequestOutcome::Ignored;
        }

        match &self.in_flight {
            Some(in_flight) if in_flight.criterion == criterion => {
                tracing::debug!("{} is already loading", criterion);
                return RequestOutcome::Ignored;
            }
            None if self.load_state == LoadState::Loaded && self.state.criterion == criterion => {
                tracing::debug!("{} is already loaded", criterion);
                return RequestOutcome::Ignored;
            }
            _ => {}
        }

        if !self.connectivity.is_network_available() {
            self.cancel_in_flight();
            self.state.movies = None;
            self.state.criterion = criterion;
            self.state.scroll_offset = 0;
            tracing::warn!("No connectivity; not requesting {}", criterion);
            self.fail(
                FailureReason::NoConnectivity,
                MovieError::NoConnectivity.user_friendly_message(),
            );
            return RequestOutcome::Offline;
        }

        let replaced = self.cancel_in_flight();
        self.spawn_fetch(criterion);
        self.load_state = LoadState::Loading;
        tracing::info!("Loading {}", criterion);

        if replaced {
            RequestOutcome::Replaced
        } else {
            RequestOutcome::Started
        }
    }

    /// Requests `criterion` and waits for the outcome.
    ///
    /// Returns `None` when the request was a no-op and nothing was in flight.
    pub async fn load(&mut self, criterion: SortCriterion) -> Option<ListEvent> {
        match self.request_list(criterion) {
            RequestOutcome::Offline => Some(self.failed_event(criterion)),
            _ => self.next_event().await,
        }
    }

    /// Waits for the in-flight fetch to settle and applies its result.
    ///
    /// Returns `None` immediately when nothing is in flight or the controller
    /// has been destroyed.
    pub async fn next_event(&mut self) -> Option<ListEvent> {
        loop {
            if self.destroyed {
                return None;
            }

            let wake = {
                let in_flight = self.in_flight.as_mut()?;
                let completions = &mut self.completions_rx;
                tokio::select! {
                    biased;
                    completion = completions.recv() => Wake::Delivered(completion),
                    _ = &mut in_flight.task => Wake::TaskEnded,
                }
            };

            match wake {
                Wake::Delivered(Some(completion)) => {
                    if let Some(event) = self.apply(completion) {
                        return Some(event);
                    }
                }
                Wake::Delivered(None) => return None,
                Wake::TaskEnded => return self.settle_ended_task(),
            }
        }
    }

    /// Applies any result that has already arrived, without waiting.
    pub fn poll_event(&mut self) -> Option<ListEvent> {
        while let Ok(completion) = self.completions_rx.try_recv() {
            if let Some(event) = self.apply(completion) {
                return Some(event);
            }
        }
        None
    }

    /// Start of the view. A snapshot is restored as-is with no network call;
    /// without one (or with an unreadable one) the default list is requested.
    pub fn resume(&mut self, snapshot: Option<&Snapshot>) -> LifecycleOutcome {
        if let Some(snapshot) = snapshot {
            match snapshot.restore() {
                Ok(restored) => {
                    let age = chrono::Utc::now() - restored.captured_at;
                    tracing::info!(
                        "Restored {} movies ({}) from a snapshot taken {}s ago",
                        restored.state.movies().len(),
                        restored.state.criterion,
                        age.num_seconds()
                    );

                    self.load_state = if restored.state.movies.is_some() {
                        LoadState::Loaded
                    } else {
                        restored.failure.map_or(LoadState::Idle, LoadState::Error)
                    };
                    self.state = restored.state;
                    return LifecycleOutcome::Restored;
                }
                Err(e) => tracing::warn!("Ignoring snapshot: {}", e),
            }
        }

        LifecycleOutcome::Requested(self.request_list(self.state.criterion))
    }

    /// The view came back to the foreground without being recreated.
    /// Retries the stored criterion if no movies are loaded.
    pub fn restart(&mut self) -> LifecycleOutcome {
        if self.state.movies.is_none() && !self.is_loading() {
            tracing::info!("No movies loaded; retrying {}", self.state.criterion);
            LifecycleOutcome::Requested(self.request_list(self.state.criterion))
        } else {
            LifecycleOutcome::Unchanged
        }
    }

    pub fn save_state(&self) -> Result<Snapshot> {
        let failure = match self.load_state {
            LoadState::Error(reason) => Some(reason),
            _ => None,
        };
        Snapshot::capture(&self.state, failure)
    }

    /// Tears the controller down; an outstanding result is dropped on delivery.
    pub fn destroy(&mut self) {
        if self.cancel_in_flight() {
            tracing::debug!("Discarding outstanding fetch on destroy");
        }
        self.destroyed = true;
        self.completions_rx.close();
    }

    pub fn handle_lifecycle(&mut self, signal: Lifecycle) -> Result<LifecycleOutcome> {
        match signal {
            Lifecycle::Create(snapshot) => Ok(self.resume(snapshot.as_ref())),
            Lifecycle::Restart => Ok(self.restart()),
            Lifecycle::SaveState => Ok(LifecycleOutcome::Saved(self.save_state()?)),
            Lifecycle::Destroy => {
                self.destroy();
                Ok(LifecycleOutcome::Destroyed)
            }
        }
    }

    fn spawn_fetch(&mut self, criterion: SortCriterion) {
        self.generation += 1;
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let images = self.images.clone();
        let completions = self.completions_tx.clone();

        let task = tokio::spawn(async move {
            let outcome = fetch_movies(source.as_ref(), criterion, &images).await;
            if completions
                .send(Completion {
                    generation,
                    criterion,
                    outcome,
                })
                .is_err()
            {
                tracing::debug!("Controller gone; dropping result for {}", criterion);
            }
        });

        self.in_flight = Some(InFlight {
            generation,
            criterion,
            task,
        });
    }

    fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                tracing::debug!("Aborting in-flight fetch for {}", in_flight.criterion);
                in_flight.task.abort();
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, completion: Completion) -> Option<ListEvent> {
        if self.destroyed {
            tracing::debug!("Dropping result for {} after destroy", completion.criterion);
            return None;
        }

        let current = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == completion.generation);
        if !current {
            tracing::debug!("Discarding stale result for {}", completion.criterion);
            return None;
        }
        self.in_flight = None;

        let criterion = completion.criterion;
        match completion.outcome {
            Ok(movies) => {
                let count = movies.len();
                self.state.movies = Some(movies);
                self.state.criterion = criterion;
                self.state.scroll_offset = 0;
                self.load_state = LoadState::Loaded;
                self.last_error = None;
                tracing::info!("Loaded {} movies for {}", count, criterion);
                Some(ListEvent::Loaded { criterion, count })
            }
            Err(e) => {
                // a kept collection stays paired with the criterion it was fetched for
                if self.state.movies.is_none() {
                    self.state.criterion = criterion;
                }
                tracing::warn!("Loading {} failed: {}", criterion, e);
                self.fail(e.failure_reason(), e.user_friendly_message());
                Some(self.failed_event(criterion))
            }
        }
    }

    fn settle_ended_task(&mut self) -> Option<ListEvent> {
        while let Ok(completion) = self.completions_rx.try_recv() {
            if let Some(event) = self.apply(completion) {
                return Some(event);
            }
        }

        let in_flight = self.in_flight.take()?;
        tracing::error!(
            "Fetch task for {} ended without a result",
            in_flight.criterion
        );
        self.fail(
            FailureReason::NetworkError,
            "The request was interrupted.".to_string(),
        );
        Some(self.failed_event(in_flight.criterion))
    }

    fn fail(&mut self, reason: FailureReason, message: String) {
        self.load_state = LoadState::Error(reason);
        self.last_error = Some(message);
    }

    fn failed_event(&self, criterion: SortCriterion) -> ListEvent {
        let reason = match self.load_state {
            LoadState::Error(reason) => reason,
            _ => FailureReason::NetworkError,
        };
        ListEvent::Failed {
            criterion,
            reason,
            message: self.last_error.clone().unwrap_or_default(),
        }
    }
}

impl<S, N> Drop for ListController<S, N> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.task.abort();
        }
    }
}
