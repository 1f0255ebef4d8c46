//! Data source edits and schema import.

use std::sync::Arc;

use tracing::debug;

use synthdata_foundation::{DataSourceId, ProjectId, Result};
use synthdata_storage::transform;
use synthdata_storage::{DataSource, Project, RootStore};

use super::{active_project, apply_to_project, commit_project, remote_failure};
use crate::remote::{DataSourceWriter, DatabaseParams, DatabaseWrite, FileUpload};

/// Manages the data sources of the active project.
pub struct DataSourceFacade {
    store: Arc<RootStore>,
    writer: Arc<dyn DataSourceWriter>,
}

impl DataSourceFacade {
    /// Creates a facade over `store`.
    pub fn new(store: Arc<RootStore>, writer: Arc<dyn DataSourceWriter>) -> Self {
        Self { store, writer }
    }

    /// Registers a database connection with the active project.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveProject` when no project is loaded, or with the
    /// writer's error.
    pub async fn create_database(&self, params: DatabaseParams) -> Result<DataSource> {
        let project_id = active_project(&self.store, "create_database")?;
        let source = self
            .writer
            .create_database(params.for_project(project_id))
            .await
            .map_err(remote_failure("create_database"))?;
        Ok(self.add(project_id, source))
    }

    /// Uploads a data file into the active project.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveProject` when no project is loaded, or with the
    /// writer's error.
    pub async fn create_file_source(
        &self,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        contents: Vec<u8>,
    ) -> Result<DataSource> {
        let project_id = active_project(&self.store, "create_file_source")?;
        let upload = FileUpload {
            project_id,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            contents,
        };
        let source = self
            .writer
            .create_file(upload)
            .await
            .map_err(remote_failure("create_file_source"))?;
        Ok(self.add(project_id, source))
    }

    /// Provisions a mock database for the active project.
    ///
    /// # Errors
    ///
    /// Fails with `NoActiveProject` when no project is loaded, or with the
    /// writer's error.
    pub async fn mock_database(&self) -> Result<DataSource> {
        let project_id = active_project(&self.store, "mock_database")?;
        let source = self
            .writer
            .mock_database(project_id)
            .await
            .map_err(remote_failure("mock_database"))?;
        Ok(self.add(project_id, source))
    }

    fn add(&self, project_id: ProjectId, source: DataSource) -> DataSource {
        debug!(data_source = %source.id(), project = %project_id, kind = ?source.kind(), "data source created");
        apply_to_project(&self.store, project_id, |root| {
            transform::add_data_source(root, source.clone())
        });
        source
    }

    /// Patches database connection `id`.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn patch_database(&self, id: DataSourceId, patch: DatabaseWrite) -> Result<DataSource> {
        let source = self
            .writer
            .patch_database(id, patch)
            .await
            .map_err(remote_failure("patch_database"))?;
        debug!(data_source = %id, "data source patched");
        self.store.patch_data_source(source.clone());
        Ok(source)
    }

    /// Deletes data source `id`.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn delete(&self, id: DataSourceId) -> Result<()> {
        self.writer
            .delete_data_source(id)
            .await
            .map_err(remote_failure("delete_data_source"))?;
        debug!(data_source = %id, "data source deleted");
        self.store.delete_data_source(id);
        Ok(())
    }

    /// Imports the schema of data source `id` into its project.
    ///
    /// The server answers with the whole project, which replaces the root.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub async fn import_schema(&self, id: DataSourceId) -> Result<Project> {
        let project = self
            .writer
            .import_schema(id)
            .await
            .map_err(remote_failure("import_schema"))?;
        debug!(data_source = %id, tables = project.tables().len(), "schema imported");
        commit_project(&self.store, project.clone());
        Ok(project)
    }
}
