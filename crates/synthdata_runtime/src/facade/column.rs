//! Column edits.

use std::sync::Arc;

use tracing::debug;

use synthdata_foundation::{ColumnId, GeneratorSettingId, Result, TableId};
use synthdata_storage::transform;
use synthdata_storage::{Column, RootStore};

use super::{active_project, apply_to_project, commit_project, remote_failure};
use crate::remote::{ColumnCreate, ColumnWrite, ColumnWriter};

/// Creates, patches and deletes columns of the active project.
pub struct ColumnFacade {
    store: Arc<RootStore>,
    writer: Arc<dyn ColumnWriter>,
}

impl ColumnFacade {
    /// Creates a facade over `store`.
    pub fn new(store: Arc<RootStore>, writer: Arc<dyn ColumnWriter>) -> Self {
        Self { store, writer }
    }

    /// Creates a column and appends it to its table.
    ///
    /// The column lands only if the project that was active when the request
    /// went out is still active when the server answers.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveProject` when no project is loaded, or with the
    /// writer's error.
    pub async fn create_column(&self, body: ColumnCreate) -> Result<Column> {
        let project_id = active_project(&self.store, "create_column")?;
        let table_id = body.table_id;
        let column = self
            .writer
            .create_column(body)
            .await
            .map_err(remote_failure("create_column"))?;
        debug!(table = %table_id, column = %column.id(), project = %project_id, "column created");
        apply_to_project(&self.store, project_id, |root| {
            transform::add_column(root, table_id, column.clone())
        });
        Ok(column)
    }

    /// Patches column `column_id` of table `table_id`.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn patch_column(
        &self,
        table_id: TableId,
        column_id: ColumnId,
        patch: ColumnWrite,
    ) -> Result<Column> {
        let column = self
            .writer
            .patch_column(column_id, patch)
            .await
            .map_err(remote_failure("patch_column"))?;
        debug!(table = %table_id, column = %column_id, "column patched");
        self.store.patch_column(table_id, column.clone());
        Ok(column)
    }

    /// Points a column at an existing generator setting of its table.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn set_column_generator_setting(
        &self,
        table_id: TableId,
        column_id: ColumnId,
        setting_id: GeneratorSettingId,
    ) -> Result<Column> {
        let patch = ColumnWrite {
            generator_setting_id: Some(Some(setting_id)),
            ..ColumnWrite::default()
        };
        self.patch_column(table_id, column_id, patch).await
    }

    /// Deletes column `column_id`.
    ///
    /// The server answers with the whole project, which replaces the root.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn delete_column(&self, column_id: ColumnId) -> Result<()> {
        let project = self
            .writer
            .delete_column(column_id)
            .await
            .map_err(remote_failure("delete_column"))?;
        debug!(column = %column_id, project = %project.id(), "column deleted");
        commit_project(&self.store, project);
        Ok(())
    }
}
