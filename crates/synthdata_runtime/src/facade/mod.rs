//! Server-backed edits of the active project.
//!
//! Each facade calls a remote writer first and touches the store only once
//! the server has answered. A failed write returns its error and leaves the
//! store as it was.
//!
//! Edits carrying a project id (creations, whole-project answers) are only
//! applied while that project is still the active one; the others look their
//! target up by id in whatever root is current when the answer arrives.

pub mod column;
pub mod data_source;
pub mod generator;
pub mod table;

pub use column::ColumnFacade;
pub use data_source::DataSourceFacade;
pub use generator::GeneratorFacade;
pub use table::TableFacade;

use tracing::debug;

use synthdata_foundation::{Error, ErrorContext, ProjectId, RemoteError, Result};
use synthdata_storage::transform::{self, Root};
use synthdata_storage::{Project, RootStore};

/// Maps a writer failure to an [`Error`] naming the operation.
fn remote_failure(operation: &'static str) -> impl FnOnce(RemoteError) -> Error {
    move |err| {
        debug!(operation, error = %err, "remote write failed");
        Error::from(err).with_context(ErrorContext::new().with_operation(operation))
    }
}

/// Returns the active project's id.
fn active_project(store: &RootStore, operation: &'static str) -> Result<ProjectId> {
    store.project_id().ok_or_else(|| {
        Error::no_active_project().with_context(ErrorContext::new().with_operation(operation))
    })
}

/// Applies `f` if `project` is still the active project.
fn apply_to_project<F>(store: &RootStore, project: ProjectId, f: F) -> bool
where
    F: FnOnce(&Root) -> Root,
{
    store.apply(|root| match root {
        Some(current) if current.id() == project => f(root),
        _ => {
            debug!(project = %project, "project no longer active; answer dropped");
            root.clone()
        }
    })
}

/// Replaces the root with a whole project sent back by the server.
fn commit_project(store: &RootStore, project: Project) -> bool {
    let id = project.id();
    apply_to_project(store, id, move |_| transform::replace_root(project))
}
