//! Table edits.

use std::sync::Arc;

use tracing::debug;

use synthdata_foundation::{Result, TableId};
use synthdata_storage::transform;
use synthdata_storage::{RootStore, Table};

use super::{active_project, apply_to_project, remote_failure};
use crate::remote::{TableCreate, TableWrite, TableWriter};

/// Creates, renames and deletes tables of the active project.
pub struct TableFacade {
    store: Arc<RootStore>,
    writer: Arc<dyn TableWriter>,
}

impl TableFacade {
    /// Creates a facade over `store`.
    pub fn new(store: Arc<RootStore>, writer: Arc<dyn TableWriter>) -> Self {
        Self { store, writer }
    }

    /// Creates an empty table in the active project.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveProject` when no project is loaded, or with the
    /// writer's error.
    pub async fn create_table(&self, name: impl Into<String>) -> Result<Table> {
        let project_id = active_project(&self.store, "create_table")?;
        let table = self
            .writer
            .create_table(TableCreate {
                project_id,
                name: name.into(),
            })
            .await
            .map_err(remote_failure("create_table"))?;
        debug!(table = %table.id(), project = %project_id, "table created");
        apply_to_project(&self.store, project_id, |root| {
            transform::add_table(root, table.clone())
        });
        Ok(table)
    }

    /// Renames table `id`.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn rename_table(&self, id: TableId, name: impl Into<String>) -> Result<Table> {
        let patch = TableWrite {
            name: Some(name.into()),
        };
        let table = self
            .writer
            .patch_table(id, patch)
            .await
            .map_err(remote_failure("rename_table"))?;
        debug!(table = %id, "table renamed");
        self.store.patch_table(table.clone());
        Ok(table)
    }

    /// Deletes table `id`.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn delete_table(&self, id: TableId) -> Result<()> {
        self.writer
            .delete_table(id)
            .await
            .map_err(remote_failure("delete_table"))?;
        debug!(table = %id, "table deleted");
        self.store.delete_table(id);
        Ok(())
    }
}
