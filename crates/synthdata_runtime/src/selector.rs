//! Selection of the active project.
//!
//! [`RootSelector::select`] starts a background load and supersedes every
//! load issued before it. Supersession is a generation counter: each select
//! takes a fresh generation, and a load only commits if its generation is
//! still the latest when it completes. A superseded load may still run to
//! completion on the server; its result is dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use synthdata_foundation::{Error, ErrorContext, ProjectId};
use synthdata_storage::transform;
use synthdata_storage::{Project, RootStore};

use crate::config::SelectorConfig;
use crate::remote::{ErrorSink, ProjectLoader, RemoteResult};

/// Where the selector is in its load cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectorState {
    /// Nothing selected, or the last load failed.
    Idle,
    /// A load of this project is in flight.
    Loading(ProjectId),
    /// This project was loaded and committed to the store.
    Loaded(ProjectId),
}

struct Shared {
    generation: AtomicU64,
    state: Mutex<SelectorState>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, SelectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn supersede(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Loads projects by id into a [`RootStore`].
///
/// Requires a tokio runtime: loads run as spawned tasks. Dropping the
/// selector supersedes any load still in flight.
pub struct RootSelector {
    store: Arc<RootStore>,
    loader: Arc<dyn ProjectLoader>,
    errors: Arc<dyn ErrorSink>,
    config: SelectorConfig,
    shared: Arc<Shared>,
}

impl RootSelector {
    /// Creates a selector with the default configuration.
    pub fn new(
        store: Arc<RootStore>,
        loader: Arc<dyn ProjectLoader>,
        errors: Arc<dyn ErrorSink>,
    ) -> Self {
        Self::with_config(store, loader, errors, SelectorConfig::default())
    }

    /// Creates a selector with an explicit configuration.
    pub fn with_config(
        store: Arc<RootStore>,
        loader: Arc<dyn ProjectLoader>,
        errors: Arc<dyn ErrorSink>,
        config: SelectorConfig,
    ) -> Self {
        Self {
            store,
            loader,
            errors,
            config,
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                state: Mutex::new(SelectorState::Idle),
            }),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SelectorState {
        *self.shared.state()
    }

    /// Returns the id most recently selected, whether loading or loaded.
    #[must_use]
    pub fn active_id(&self) -> Option<ProjectId> {
        match self.state() {
            SelectorState::Idle => None,
            SelectorState::Loading(id) | SelectorState::Loaded(id) => Some(id),
        }
    }

    /// Selects project `id`.
    ///
    /// Any earlier load is superseded. The returned handle completes once
    /// this load has committed, failed, or been discarded as stale; awaiting
    /// it is optional.
    pub fn select(&self, id: ProjectId) -> JoinHandle<()> {
        let generation = {
            let mut state = self.shared.state();
            let same = matches!(
                *state,
                SelectorState::Loading(current) | SelectorState::Loaded(current) if current == id
            );
            if same && !self.config.reload_same_id {
                debug!(project = %id, "project already selected; select ignored");
                return tokio::spawn(async {});
            }
            *state = SelectorState::Loading(id);
            self.shared.supersede()
        };
        debug!(project = %id, generation, "loading project");

        let load = PendingLoad {
            id,
            generation,
            validate: self.config.validate_on_load,
            shared: Arc::clone(&self.shared),
            store: Arc::clone(&self.store),
            errors: Arc::clone(&self.errors),
        };
        let loader = Arc::clone(&self.loader);
        tokio::spawn(async move {
            let result = loader.load_by_id(id).await;
            load.complete(result);
        })
    }

    /// Supersedes any in-flight load.
    ///
    /// The store keeps whatever it currently holds.
    pub fn dispose(&self) {
        let mut state = self.shared.state();
        self.shared.supersede();
        if matches!(*state, SelectorState::Loading(_)) {
            *state = SelectorState::Idle;
        }
        debug!("selector disposed");
    }
}

impl Drop for RootSelector {
    fn drop(&mut self) {
        self.shared.supersede();
    }
}

impl fmt::Debug for RootSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootSelector")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Everything a spawned load needs once the loader answers.
struct PendingLoad {
    id: ProjectId,
    generation: u64,
    validate: bool,
    shared: Arc<Shared>,
    store: Arc<RootStore>,
    errors: Arc<dyn ErrorSink>,
}

impl PendingLoad {
    fn complete(self, result: RemoteResult<Project>) {
        let outcome = result.map_err(Error::from).and_then(|project| {
            if self.validate {
                project.validate()?;
            }
            Ok(project)
        });

        match outcome {
            Ok(project) => self.commit(project),
            Err(err) => self.fail(err),
        }
    }

    fn commit(&self, project: Project) {
        // Generation is checked under the store's writer lock, so a select
        // racing this commit either lands before it (and wins) or after it.
        let mut fresh = false;
        self.store.apply(|root| {
            if self.shared.is_current(self.generation) {
                fresh = true;
                transform::replace_root(project)
            } else {
                root.clone()
            }
        });
        if !fresh {
            debug!(project = %self.id, generation = self.generation, "stale load discarded");
            return;
        }

        let mut state = self.shared.state();
        if self.shared.is_current(self.generation) {
            *state = SelectorState::Loaded(self.id);
        }
        debug!(project = %self.id, generation = self.generation, "project loaded");
    }

    fn fail(&self, err: Error) {
        {
            let mut state = self.shared.state();
            if !self.shared.is_current(self.generation) {
                debug!(project = %self.id, generation = self.generation, "stale load failure discarded");
                return;
            }
            *state = SelectorState::Idle;
        }
        warn!(project = %self.id, error = %err, "project load failed");
        let err = err.with_context(
            ErrorContext::new()
                .with_operation("load_project")
                .with_project(self.id),
        );
        self.errors.report(&err);
    }
}
