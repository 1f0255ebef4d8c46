//! In-memory server for testing and ephemeral use.
//!
//! [`InMemoryServer`] keeps its projects in a `Vec` behind a `RwLock` and
//! implements every collaborator trait of [`crate::remote`]. Edits go
//! through the same transforms the client uses, so the canonical entities it
//! returns are what a real server would answer with. Ids it assigns start at
//! 1000.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::trace;

use synthdata_foundation::{
    ColumnId, DataSourceId, GeneratorSettingId, ProjectId, RemoteError, TableId,
};
use synthdata_storage::transform::{self, Root};
use synthdata_storage::{Column, DataSource, GeneratorSetting, Project, Table};

use crate::catalog::GeneratorInfo;
use crate::remote::{
    ColumnCreate, ColumnWrite, ColumnWriter, DataSourceWriter, DatabaseCreate, DatabaseWrite,
    FileUpload, GeneratorSettingCreate, GeneratorSettingWrite, GeneratorSettingWriter,
    GeneratorSource, ProjectLister, ProjectLoader, RemoteResult, TableCreate, TableWrite,
    TableWriter,
};

const FIRST_ID: u64 = 1000;

/// An in-memory implementation of every remote collaborator.
#[derive(Debug)]
pub struct InMemoryServer {
    projects: RwLock<Vec<Arc<Project>>>,
    generators: RwLock<Vec<GeneratorInfo>>,
    next_id: AtomicU64,
    failure: Mutex<Option<RemoteError>>,
}

impl InMemoryServer {
    /// Creates a server with no projects and no generators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(Vec::new()),
            generators: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(FIRST_ID),
            failure: Mutex::new(None),
        }
    }

    /// Adds a project, replacing any project with the same id.
    #[must_use]
    pub fn with_project(self, project: Project) -> Self {
        self.insert_project(project);
        self
    }

    /// Adds a generator kind.
    #[must_use]
    pub fn with_generator(self, generator: GeneratorInfo) -> Self {
        self.generators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(generator);
        self
    }

    /// Adds a project, replacing any project with the same id.
    pub fn insert_project(&self, project: Project) {
        let mut projects = self.projects.write().unwrap_or_else(PoisonError::into_inner);
        projects.retain(|p| p.id() != project.id());
        projects.push(Arc::new(project));
    }

    /// Returns the server's copy of project `id`.
    #[must_use]
    pub fn project(&self, id: ProjectId) -> Option<Project> {
        self.projects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.id() == id)
            .map(|p| Project::clone(p))
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: RemoteError) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    fn check_failure(&self) -> RemoteResult<()> {
        match self.failure.lock().unwrap_or_else(PoisonError::into_inner).take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Runs `f` on the first project matching `locate` and stores its result.
    fn update<T, L, F>(&self, what: impl FnOnce() -> String, locate: L, f: F) -> RemoteResult<T>
    where
        L: Fn(&Project) -> bool,
        F: FnOnce(&Root) -> RemoteResult<(Root, T)>,
    {
        self.check_failure()?;
        let mut projects = self.projects.write().unwrap_or_else(PoisonError::into_inner);
        let slot = projects
            .iter_mut()
            .find(|p| locate(p))
            .ok_or_else(|| RemoteError::NotFound(what()))?;
        let (next, value) = f(&Some(Arc::clone(slot)))?;
        if let Some(next) = next {
            *slot = next;
        }
        Ok(value)
    }
}

impl Default for InMemoryServer {
    fn default() -> Self {
        Self::new()
    }
}

fn holds_column(project: &Project, id: ColumnId) -> bool {
    project.tables().iter().any(|t| t.find_column(id).is_some())
}

fn holds_setting(project: &Project, id: GeneratorSettingId) -> bool {
    project
        .tables()
        .iter()
        .any(|t| t.find_generator_setting(id).is_some())
}

fn table_of_column(root: &Root, id: ColumnId) -> Option<Arc<Table>> {
    root.as_ref()?
        .tables()
        .find(|t| t.find_column(id).is_some())
        .cloned()
}

fn table_of_setting(root: &Root, id: GeneratorSettingId) -> Option<Arc<Table>> {
    root.as_ref()?
        .tables()
        .find(|t| t.find_generator_setting(id).is_some())
        .cloned()
}

fn not_found(what: impl std::fmt::Display) -> RemoteError {
    RemoteError::NotFound(what.to_string())
}

#[async_trait]
impl ProjectLoader for InMemoryServer {
    async fn load_by_id(&self, id: ProjectId) -> RemoteResult<Project> {
        self.check_failure()?;
        trace!(project = %id, "serving project");
        self.project(id).ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl ProjectLister for InMemoryServer {
    async fn list_projects(&self) -> RemoteResult<Vec<Project>> {
        self.check_failure()?;
        let projects = self.projects.read().unwrap_or_else(PoisonError::into_inner);
        trace!(projects = projects.len(), "serving project list");
        Ok(projects.iter().map(|p| Project::clone(p)).collect())
    }
}

#[async_trait]
impl TableWriter for InMemoryServer {
    async fn create_table(&self, body: TableCreate) -> RemoteResult<Table> {
        let table = Table::new(TableId::new(self.next_id()), body.name);
        self.update(
            || body.project_id.to_string(),
            |p| p.id() == body.project_id,
            |root| Ok((transform::add_table(root, table.clone()), table.clone())),
        )
    }

    async fn patch_table(&self, id: TableId, patch: TableWrite) -> RemoteResult<Table> {
        self.update(
            || id.to_string(),
            |p| p.find_table(id).is_some(),
            |root| {
                let current = root
                    .as_ref()
                    .and_then(|p| p.find_table(id))
                    .ok_or_else(|| not_found(id))?;
                let table = match patch.name {
                    Some(name) => current.renamed(name),
                    None => Table::clone(current),
                };
                Ok((transform::patch_table(root, table.clone()), table))
            },
        )
    }

    async fn delete_table(&self, id: TableId) -> RemoteResult<()> {
        self.update(
            || id.to_string(),
            |p| p.find_table(id).is_some(),
            |root| Ok((transform::delete_table(root, id), ())),
        )
    }
}

#[async_trait]
impl ColumnWriter for InMemoryServer {
    async fn create_column(&self, body: ColumnCreate) -> RemoteResult<Column> {
        let mut column = Column::new(ColumnId::new(self.next_id()), body.name, body.col_type)
            .nullable(body.nullable);
        if let Some(setting) = body.generator_setting_id {
            column = column.with_generator(setting);
        }
        self.update(
            || body.table_id.to_string(),
            |p| p.find_table(body.table_id).is_some(),
            |root| Ok((transform::add_column(root, body.table_id, column.clone()), column)),
        )
    }

    async fn patch_column(&self, id: ColumnId, patch: ColumnWrite) -> RemoteResult<Column> {
        self.update(
            || id.to_string(),
            |p| holds_column(p, id),
            |root| {
                let table = table_of_column(root, id).ok_or_else(|| not_found(id))?;
                let current = table.find_column(id).ok_or_else(|| not_found(id))?;
                let mut column = Column::new(
                    id,
                    patch.name.unwrap_or_else(|| current.name().to_string()),
                    patch.col_type.unwrap_or(current.col_type()),
                )
                .nullable(patch.nullable.unwrap_or(current.is_nullable()));
                let setting = patch
                    .generator_setting_id
                    .unwrap_or(current.generator_setting_id());
                if let Some(setting) = setting {
                    if table.find_generator_setting(setting).is_none() {
                        return Err(RemoteError::Rejected(format!(
                            "{setting} does not belong to {}",
                            table.id()
                        )));
                    }
                    column = column.with_generator(setting);
                }
                Ok((transform::patch_column(root, table.id(), column.clone()), column))
            },
        )
    }

    async fn delete_column(&self, id: ColumnId) -> RemoteResult<Project> {
        self.update(
            || id.to_string(),
            |p| holds_column(p, id),
            |root| {
                let table = table_of_column(root, id).ok_or_else(|| not_found(id))?;
                let next = transform::delete_column(root, table.id(), id);
                let project = next.as_deref().cloned().ok_or_else(|| not_found(id))?;
                Ok((next, project))
            },
        )
    }
}

#[async_trait]
impl GeneratorSettingWriter for InMemoryServer {
    async fn create_setting(
        &self,
        body: GeneratorSettingCreate,
    ) -> RemoteResult<GeneratorSetting> {
        let setting = GeneratorSetting::new(GeneratorSettingId::new(self.next_id()), body.name)
            .with_null_frequency(body.null_frequency);
        let setting = setting.with_params(body.params);
        self.update(
            || body.table_id.to_string(),
            |p| p.find_table(body.table_id).is_some(),
            |root| {
                let next = match body.column_id {
                    Some(column) => {
                        transform::add_generator_setting(root, body.table_id, column, setting.clone())
                    }
                    None => transform::replace_table(root, body.table_id, |t| {
                        Arc::new(Table::clone(t).with_generator_setting(setting.clone()))
                    }),
                };
                Ok((next, setting))
            },
        )
    }

    async fn patch_setting(
        &self,
        id: GeneratorSettingId,
        patch: GeneratorSettingWrite,
    ) -> RemoteResult<GeneratorSetting> {
        self.update(
            || id.to_string(),
            |p| holds_setting(p, id),
            |root| {
                let table = table_of_setting(root, id).ok_or_else(|| not_found(id))?;
                let mut setting = table
                    .find_generator_setting(id)
                    .map(|s| GeneratorSetting::clone(s))
                    .ok_or_else(|| not_found(id))?;
                if let Some(name) = patch.name {
                    setting = setting.renamed(name);
                }
                if let Some(params) = patch.params {
                    setting = setting.with_params(params);
                }
                if let Some(null_frequency) = patch.null_frequency {
                    setting = setting.with_null_frequency(null_frequency);
                }
                setting
                    .validate()
                    .map_err(|err| RemoteError::Rejected(err.to_string()))?;
                let next = transform::patch_generator_setting(root, table.id(), setting.clone());
                Ok((next, setting))
            },
        )
    }

    async fn delete_setting(&self, id: GeneratorSettingId) -> RemoteResult<()> {
        self.update(
            || id.to_string(),
            |p| holds_setting(p, id),
            |root| {
                let table = table_of_setting(root, id).ok_or_else(|| not_found(id))?;
                Ok((transform::delete_generator_setting(root, table.id(), id), ()))
            },
        )
    }
}

#[async_trait]
impl DataSourceWriter for InMemoryServer {
    async fn create_database(&self, body: DatabaseCreate) -> RemoteResult<DataSource> {
        let source = DataSource::database(DataSourceId::new(self.next_id()), body.driver, body.db)
            .with_host(body.host, body.port)
            .with_user(body.usr);
        self.update(
            || body.project_id.to_string(),
            |p| p.id() == body.project_id,
            |root| Ok((transform::add_data_source(root, source.clone()), source)),
        )
    }

    async fn create_file(&self, file: FileUpload) -> RemoteResult<DataSource> {
        let source = DataSource::file(
            DataSourceId::new(self.next_id()),
            file.file_name,
            file.mime_type,
        );
        self.update(
            || file.project_id.to_string(),
            |p| p.id() == file.project_id,
            |root| Ok((transform::add_data_source(root, source.clone()), source)),
        )
    }

    async fn mock_database(&self, project: ProjectId) -> RemoteResult<DataSource> {
        let id = DataSourceId::new(self.next_id());
        let source = DataSource::database(id, "postgres", format!("mock_{}", id.raw()))
            .with_host("localhost", 5432)
            .with_user("mock");
        self.update(
            || project.to_string(),
            |p| p.id() == project,
            |root| Ok((transform::add_data_source(root, source.clone()), source)),
        )
    }

    async fn patch_database(
        &self,
        id: DataSourceId,
        patch: DatabaseWrite,
    ) -> RemoteResult<DataSource> {
        self.update(
            || id.to_string(),
            |p| p.find_data_source(id).is_some(),
            |root| {
                let current = root
                    .as_ref()
                    .and_then(|p| p.find_data_source(id))
                    .ok_or_else(|| not_found(id))?;
                let driver = patch
                    .driver
                    .or_else(|| current.driver().map(str::to_string))
                    .unwrap_or_default();
                let db = patch
                    .db
                    .or_else(|| current.db().map(str::to_string))
                    .unwrap_or_default();
                let mut source = DataSource::database(id, driver, db);
                let host = patch.host.or_else(|| current.host().map(str::to_string));
                if let (Some(host), Some(port)) = (host, patch.port.or(current.port())) {
                    source = source.with_host(host, port);
                }
                if let Some(usr) = patch.usr.or_else(|| current.usr().map(str::to_string)) {
                    source = source.with_user(usr);
                }
                Ok((transform::patch_data_source(root, source.clone()), source))
            },
        )
    }

    async fn delete_data_source(&self, id: DataSourceId) -> RemoteResult<()> {
        self.update(
            || id.to_string(),
            |p| p.find_data_source(id).is_some(),
            |root| Ok((transform::delete_data_source(root, id), ())),
        )
    }

    async fn import_schema(&self, id: DataSourceId) -> RemoteResult<Project> {
        let table = Table::new(TableId::new(self.next_id()), format!("imported_{}", id.raw()));
        self.update(
            || id.to_string(),
            |p| p.find_data_source(id).is_some(),
            |root| {
                let next = transform::add_table(root, table);
                let project = next.as_deref().cloned().ok_or_else(|| not_found(id))?;
                Ok((next, project))
            },
        )
    }
}

#[async_trait]
impl GeneratorSource for InMemoryServer {
    async fn list_generators(&self) -> RemoteResult<Vec<GeneratorInfo>> {
        self.check_failure()?;
        Ok(self
            .generators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
