//! Cached list of the user's projects.
//!
//! [`ProjectList::refresh`] fetches the list from the server. Between
//! refreshes the list follows the active project: subscribed to a
//! [`RootStore`](synthdata_storage::RootStore), every committed project
//! replaces the entry with the same id.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use synthdata_foundation::{ProjectId, Result};
use synthdata_storage::{Observer, Project, Root};

use crate::remote::ProjectLister;

/// Projects as last listed by the server, patched with local edits.
pub struct ProjectList {
    source: Arc<dyn ProjectLister>,
    items: RwLock<Arc<Vec<Arc<Project>>>>,
}

impl ProjectList {
    /// Creates an empty list. Call [`refresh`](Self::refresh) to fill it.
    pub fn new(source: Arc<dyn ProjectLister>) -> Self {
        Self {
            source,
            items: RwLock::new(Arc::new(Vec::new())),
        }
    }

    fn items(&self) -> Arc<Vec<Arc<Project>>> {
        Arc::clone(&self.items.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Fetches the project list and replaces the cache.
    ///
    /// Returns the number of projects now cached.
    ///
    /// # Errors
    ///
    /// Returns the source's error; the cache is left as it was.
    pub async fn refresh(&self) -> Result<usize> {
        let projects = self.source.list_projects().await?;
        let items: Vec<_> = projects.into_iter().map(Arc::new).collect();
        let count = items.len();
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(items);
        debug!(projects = count, "project list refreshed");
        Ok(count)
    }

    /// Returns every cached project in server order.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<Project>> {
        self.items().as_ref().clone()
    }

    /// Returns the cached project `id`.
    #[must_use]
    pub fn get(&self, id: ProjectId) -> Option<Arc<Project>> {
        self.items().iter().find(|p| p.id() == id).cloned()
    }

    /// Returns the number of cached projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Replaces the cached entry with `project`'s id.
    ///
    /// Projects not in the list are ignored; only a refresh adds entries.
    /// Returns whether an entry was replaced.
    pub fn patch_project(&self, project: Arc<Project>) -> bool {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let Some(index) = items.iter().position(|p| p.id() == project.id()) else {
            trace!(project = %project.id(), "project not listed; list unchanged");
            return false;
        };
        if Arc::ptr_eq(&items[index], &project) {
            return false;
        }
        Arc::make_mut(&mut *items)[index] = project;
        true
    }
}

impl Observer for ProjectList {
    fn notify(&self, root: &Root) {
        if let Some(project) = root {
            self.patch_project(Arc::clone(project));
        }
    }
}

impl fmt::Debug for ProjectList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectList")
            .field("projects", &self.len())
            .finish_non_exhaustive()
    }
}
