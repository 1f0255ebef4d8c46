//! Interfaces to the server that owns the project graph.
//!
//! The runtime never talks to the network itself. Each collaborator is an
//! async trait; a writer returns the server's canonical copy of what it
//! changed, or the whole project when the server cascaded the change.

use async_trait::async_trait;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use synthdata_foundation::{
    ColumnId, ColumnType, DataSourceId, Error, GeneratorSettingId, ParamBag, ProjectId,
    RemoteError, TableId,
};
use synthdata_storage::{Column, DataSource, GeneratorSetting, Project, Table};

use crate::catalog::GeneratorInfo;

/// Result of a remote call.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

// =============================================================================
// Collaborators
// =============================================================================

/// Loads a whole project by id.
#[async_trait]
pub trait ProjectLoader: Send + Sync {
    /// Fetches the project `id`.
    async fn load_by_id(&self, id: ProjectId) -> RemoteResult<Project>;
}

/// Lists the projects visible to the current user.
#[async_trait]
pub trait ProjectLister: Send + Sync {
    /// Fetches every project, in server order.
    async fn list_projects(&self) -> RemoteResult<Vec<Project>>;
}

/// Server operations on tables.
#[async_trait]
pub trait TableWriter: Send + Sync {
    /// Creates a table and returns it.
    async fn create_table(&self, table: TableCreate) -> RemoteResult<Table>;
    /// Patches a table and returns the updated table.
    async fn patch_table(&self, id: TableId, patch: TableWrite) -> RemoteResult<Table>;
    /// Deletes a table.
    async fn delete_table(&self, id: TableId) -> RemoteResult<()>;
}

/// Server operations on columns.
#[async_trait]
pub trait ColumnWriter: Send + Sync {
    /// Creates a column and returns it.
    async fn create_column(&self, column: ColumnCreate) -> RemoteResult<Column>;
    /// Patches a column and returns the updated column.
    async fn patch_column(&self, id: ColumnId, patch: ColumnWrite) -> RemoteResult<Column>;
    /// Deletes a column. The server cascades and answers with the project.
    async fn delete_column(&self, id: ColumnId) -> RemoteResult<Project>;
}

/// Server operations on generator settings.
#[async_trait]
pub trait GeneratorSettingWriter: Send + Sync {
    /// Creates a setting, optionally assigned to a column, and returns it.
    async fn create_setting(&self, setting: GeneratorSettingCreate)
    -> RemoteResult<GeneratorSetting>;
    /// Patches a setting and returns the updated setting.
    async fn patch_setting(
        &self,
        id: GeneratorSettingId,
        patch: GeneratorSettingWrite,
    ) -> RemoteResult<GeneratorSetting>;
    /// Deletes a setting.
    async fn delete_setting(&self, id: GeneratorSettingId) -> RemoteResult<()>;
}

/// Server operations on data sources.
#[async_trait]
pub trait DataSourceWriter: Send + Sync {
    /// Registers a database connection.
    async fn create_database(&self, database: DatabaseCreate) -> RemoteResult<DataSource>;
    /// Uploads a data file.
    async fn create_file(&self, file: FileUpload) -> RemoteResult<DataSource>;
    /// Asks the server to provision a mock database for `project`.
    async fn mock_database(&self, project: ProjectId) -> RemoteResult<DataSource>;
    /// Patches a database connection.
    async fn patch_database(
        &self,
        id: DataSourceId,
        patch: DatabaseWrite,
    ) -> RemoteResult<DataSource>;
    /// Deletes a data source.
    async fn delete_data_source(&self, id: DataSourceId) -> RemoteResult<()>;
    /// Imports the schema of a data source into its project.
    async fn import_schema(&self, id: DataSourceId) -> RemoteResult<Project>;
}

/// Lists the generator kinds the server offers.
#[async_trait]
pub trait GeneratorSource: Send + Sync {
    /// Fetches every registered generator kind.
    async fn list_generators(&self) -> RemoteResult<Vec<GeneratorInfo>>;
}

/// Receives failures nobody awaits, such as a background project load.
pub trait ErrorSink: Send + Sync {
    /// Reports one failure.
    fn report(&self, error: &Error);
}

impl<F> ErrorSink for F
where
    F: Fn(&Error) + Send + Sync,
{
    fn report(&self, error: &Error) {
        self(error);
    }
}

/// Answer to a project list request.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectListing {
    /// Listed projects.
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<Project>,
}

// =============================================================================
// Request bodies
// =============================================================================

/// Body of a table creation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableCreate {
    /// Owning project.
    pub project_id: ProjectId,
    /// Table name.
    pub name: String,
}

/// Body of a table patch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableWrite {
    /// New name.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
}

/// Body of a column creation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnCreate {
    /// Owning table.
    pub table_id: TableId,
    /// Column name.
    pub name: String,
    /// Declared type.
    pub col_type: ColumnType,
    /// Whether the column accepts nulls.
    pub nullable: bool,
    /// Setting to generate values with.
    pub generator_setting_id: Option<GeneratorSettingId>,
}

impl ColumnCreate {
    /// Creates a body for a non-nullable column without a generator.
    #[must_use]
    pub fn new(table_id: TableId, name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            table_id,
            name: name.into(),
            col_type,
            nullable: false,
            generator_setting_id: None,
        }
    }
}

/// Body of a column patch. Absent fields are left unchanged.
///
/// `generator_setting_id` is doubly optional: `Some(None)` clears the
/// reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnWrite {
    /// New name.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// New type.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub col_type: Option<ColumnType>,
    /// New nullability.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub nullable: Option<bool>,
    /// New generator reference.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub generator_setting_id: Option<Option<GeneratorSettingId>>,
}

/// Body of a generator setting creation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratorSettingCreate {
    /// Owning table.
    pub table_id: TableId,
    /// Column to assign the setting to.
    pub column_id: Option<ColumnId>,
    /// Generator kind name.
    pub name: String,
    /// Generator parameters.
    pub params: ParamBag,
    /// Share of generated values that are null.
    pub null_frequency: f64,
}

/// Body of a generator setting patch. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratorSettingWrite {
    /// New generator kind.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// New parameters.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub params: Option<ParamBag>,
    /// New null frequency.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub null_frequency: Option<f64>,
    /// Let the server estimate parameters from the connected database.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub estimate_params: Option<bool>,
}

/// Body of a database data source creation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DatabaseCreate {
    /// Owning project, stamped by the facade.
    pub project_id: ProjectId,
    /// Driver name, e.g. `postgres`.
    pub driver: String,
    /// Database name.
    pub db: String,
    /// User name.
    pub usr: String,
    /// Password.
    pub pwd: String,
    /// Host name.
    pub host: String,
    /// Port.
    pub port: u16,
}

/// Connection details for a new database; the project is filled in later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseParams {
    /// Driver name, e.g. `postgres`.
    pub driver: String,
    /// Database name.
    pub db: String,
    /// User name.
    pub usr: String,
    /// Password.
    pub pwd: String,
    /// Host name.
    pub host: String,
    /// Port.
    pub port: u16,
}

impl DatabaseParams {
    /// Binds the details to a project.
    #[must_use]
    pub fn for_project(self, project_id: ProjectId) -> DatabaseCreate {
        DatabaseCreate {
            project_id,
            driver: self.driver,
            db: self.db,
            usr: self.usr,
            pwd: self.pwd,
            host: self.host,
            port: self.port,
        }
    }
}

/// Body of a database patch. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DatabaseWrite {
    /// New driver.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub driver: Option<String>,
    /// New database name.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub db: Option<String>,
    /// New user name.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub usr: Option<String>,
    /// New password.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub pwd: Option<String>,
    /// New host.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub host: Option<String>,
    /// New port.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub port: Option<u16>,
}

/// A data file to upload into a project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    /// Owning project, stamped by the facade.
    pub project_id: ProjectId,
    /// Original file name.
    pub file_name: String,
    /// MIME type of the contents.
    pub mime_type: String,
    /// Raw contents.
    pub contents: Vec<u8>,
}
