//! The root store: single owner of the active project snapshot.
//!
//! The store holds one [`Root`] and an ordered list of observers. Every
//! mutation goes through [`RootStore::apply`], which runs one transform under
//! a writer lock, swaps the root, and then notifies observers in registration
//! order. Readers never block on a transform; they clone the current `Arc`.
//!
//! Observers are called while the writer lock is held. An observer must not
//! call `apply`, `subscribe` or any mutation helper on the same store from
//! inside `notify`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, trace};

use synthdata_foundation::{ColumnId, DataSourceId, GeneratorSettingId, TableId};

use crate::column::Column;
use crate::data_source::DataSource;
use crate::generator::GeneratorSetting;
use crate::project::Project;
use crate::table::Table;
use crate::transform::{self, Root, same_root};

/// Receives every new root committed to a [`RootStore`].
pub trait Observer: Send + Sync {
    /// Called with the root that was just committed.
    fn notify(&self, root: &Root);
}

/// Adapts a closure into an [`Observer`].
pub struct FnObserver<F>(pub F);

impl<F> Observer for FnObserver<F>
where
    F: Fn(&Root) + Send + Sync,
{
    fn notify(&self, root: &Root) {
        (self.0)(root);
    }
}

/// Handle returned by [`RootStore::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Holds the active project and notifies observers of every change.
///
/// Constructed explicitly and shared by `Arc`; there is no global instance.
pub struct RootStore {
    root: RwLock<Root>,
    observers: Mutex<Vec<(SubscriptionId, Arc<dyn Observer>)>>,
    next_subscription: AtomicU64,
    writer: Mutex<()>,
}

// The root is only ever swapped whole, so a poisoned lock still guards a
// consistent snapshot.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RootStore {
    /// Creates a store with no active project.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: RwLock::new(None),
            observers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            writer: Mutex::new(()),
        }
    }

    /// Returns the current root.
    #[must_use]
    pub fn current(&self) -> Root {
        self.root
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Registers an observer.
    ///
    /// The observer is called once immediately with the current root, then
    /// after every committed change until [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, observer: Arc<dyn Observer>) -> SubscriptionId {
        let _writer = lock(&self.writer);
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        lock(&self.observers).push((id, Arc::clone(&observer)));
        trace!(subscription = id.0, "observer subscribed");
        observer.notify(&self.current());
        id
    }

    /// Registers a closure as an observer.
    pub fn subscribe_fn<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&Root) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnObserver(f)))
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = lock(&self.observers);
        let before = observers.len();
        observers.retain(|(other, _)| *other != id);
        before != observers.len()
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        lock(&self.observers).len()
    }

    /// Commits `f(current)` as the new root.
    ///
    /// Observers are notified, in registration order, only when the result
    /// is a different snapshot than the previous root. Returns whether the
    /// root changed.
    pub fn apply<F>(&self, f: F) -> bool
    where
        F: FnOnce(&Root) -> Root,
    {
        let _writer = lock(&self.writer);
        let previous = self.current();
        let next = f(&previous);
        if same_root(&previous, &next) {
            trace!("transform left root unchanged");
            return false;
        }

        *self.root.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        debug!(
            project = ?next.as_ref().map(|p| p.id()),
            "root committed"
        );

        let observers: Vec<Arc<dyn Observer>> = lock(&self.observers)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer.notify(&next);
        }
        true
    }

    /// Replaces the whole tree.
    pub fn replace_root(&self, project: impl Into<Arc<Project>>) -> bool {
        let root = transform::replace_root(project);
        self.apply(move |_| root)
    }

    /// Drops the active project.
    pub fn clear(&self) -> bool {
        self.apply(|_| None)
    }

    /// Returns the active project's id.
    #[must_use]
    pub fn project_id(&self) -> Option<synthdata_foundation::ProjectId> {
        self.current().map(|p| p.id())
    }

    /// Finds a table of the active project.
    #[must_use]
    pub fn find_table(&self, table: TableId) -> Option<Arc<Table>> {
        self.current()?.find_table(table).cloned()
    }

    /// Finds a column of the active project.
    #[must_use]
    pub fn find_column(&self, table: TableId, column: ColumnId) -> Option<Arc<Column>> {
        self.current()?.find_column(table, column).cloned()
    }

    /// See [`transform::add_table`].
    pub fn add_table(&self, table: Table) -> bool {
        self.apply(|root| transform::add_table(root, table))
    }

    /// See [`transform::patch_table`].
    pub fn patch_table(&self, table: Table) -> bool {
        self.apply(|root| transform::patch_table(root, table))
    }

    /// See [`transform::delete_table`].
    pub fn delete_table(&self, table: TableId) -> bool {
        self.apply(|root| transform::delete_table(root, table))
    }

    /// See [`transform::add_column`].
    pub fn add_column(&self, table: TableId, column: Column) -> bool {
        self.apply(|root| transform::add_column(root, table, column))
    }

    /// See [`transform::patch_column`].
    pub fn patch_column(&self, table: TableId, column: Column) -> bool {
        self.apply(|root| transform::patch_column(root, table, column))
    }

    /// See [`transform::delete_column`].
    pub fn delete_column(&self, table: TableId, column: ColumnId) -> bool {
        self.apply(|root| transform::delete_column(root, table, column))
    }

    /// See [`transform::add_generator_setting`].
    pub fn add_generator_setting(
        &self,
        table: TableId,
        column: ColumnId,
        setting: GeneratorSetting,
    ) -> bool {
        self.apply(|root| transform::add_generator_setting(root, table, column, setting))
    }

    /// See [`transform::patch_generator_setting`].
    pub fn patch_generator_setting(&self, table: TableId, setting: GeneratorSetting) -> bool {
        self.apply(|root| transform::patch_generator_setting(root, table, setting))
    }

    /// See [`transform::delete_generator_setting`].
    pub fn delete_generator_setting(&self, table: TableId, setting: GeneratorSettingId) -> bool {
        self.apply(|root| transform::delete_generator_setting(root, table, setting))
    }

    /// See [`transform::add_data_source`].
    pub fn add_data_source(&self, data_source: DataSource) -> bool {
        self.apply(|root| transform::add_data_source(root, data_source))
    }

    /// See [`transform::patch_data_source`].
    pub fn patch_data_source(&self, data_source: DataSource) -> bool {
        self.apply(|root| transform::patch_data_source(root, data_source))
    }

    /// See [`transform::delete_data_source`].
    pub fn delete_data_source(&self, data_source: DataSourceId) -> bool {
        self.apply(|root| transform::delete_data_source(root, data_source))
    }
}

impl Default for RootStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RootStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootStore")
            .field("project", &self.project_id())
            .field("observers", &self.observer_count())
            .finish()
    }
}
