//! The active-project session: one store with everything that edits it.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;

use synthdata_foundation::ProjectId;
use synthdata_storage::{Observer, Root, RootStore};

use crate::catalog::GeneratorCatalog;
use crate::config::SelectorConfig;
use crate::facade::{ColumnFacade, DataSourceFacade, GeneratorFacade, TableFacade};
use crate::project_list::ProjectList;
use crate::remote::{
    ColumnWriter, DataSourceWriter, ErrorSink, GeneratorSettingWriter, GeneratorSource,
    ProjectLister, ProjectLoader, TableWriter,
};
use crate::selector::{RootSelector, SelectorState};

/// Owns the root store of one client together with its selector, facades,
/// generator catalog and project list.
///
/// Sessions are constructed explicitly; two sessions never share state.
/// Dropping a session supersedes its in-flight project load.
pub struct ActiveProject {
    store: Arc<RootStore>,
    selector: RootSelector,
    tables: TableFacade,
    columns: ColumnFacade,
    generators: GeneratorFacade,
    data_sources: DataSourceFacade,
    catalog: GeneratorCatalog,
    projects: Arc<ProjectList>,
}

impl ActiveProject {
    /// Creates a session talking to `server` with the default selector
    /// configuration.
    pub fn new<S>(server: Arc<S>, errors: Arc<dyn ErrorSink>) -> Self
    where
        S: ProjectLoader
            + ProjectLister
            + TableWriter
            + ColumnWriter
            + GeneratorSettingWriter
            + DataSourceWriter
            + GeneratorSource
            + 'static,
    {
        Self::with_config(server, errors, SelectorConfig::default())
    }

    /// Creates a session with an explicit selector configuration.
    pub fn with_config<S>(server: Arc<S>, errors: Arc<dyn ErrorSink>, config: SelectorConfig) -> Self
    where
        S: ProjectLoader
            + ProjectLister
            + TableWriter
            + ColumnWriter
            + GeneratorSettingWriter
            + DataSourceWriter
            + GeneratorSource
            + 'static,
    {
        let store = Arc::new(RootStore::new());
        let projects = Arc::new(ProjectList::new(Arc::clone(&server) as Arc<dyn ProjectLister>));
        store.subscribe(Arc::clone(&projects) as Arc<dyn Observer>);
        Self {
            selector: RootSelector::with_config(
                Arc::clone(&store),
                Arc::clone(&server) as Arc<dyn ProjectLoader>,
                errors,
                config,
            ),
            tables: TableFacade::new(Arc::clone(&store), Arc::clone(&server) as Arc<dyn TableWriter>),
            columns: ColumnFacade::new(Arc::clone(&store), Arc::clone(&server) as Arc<dyn ColumnWriter>),
            generators: GeneratorFacade::new(
                Arc::clone(&store),
                Arc::clone(&server) as Arc<dyn GeneratorSettingWriter>,
            ),
            data_sources: DataSourceFacade::new(
                Arc::clone(&store),
                Arc::clone(&server) as Arc<dyn DataSourceWriter>,
            ),
            catalog: GeneratorCatalog::new(server as Arc<dyn GeneratorSource>),
            projects,
            store,
        }
    }

    /// Returns the root store.
    #[must_use]
    pub fn store(&self) -> &Arc<RootStore> {
        &self.store
    }

    /// Returns the current root.
    #[must_use]
    pub fn current(&self) -> Root {
        self.store.current()
    }

    /// Returns the id of the loaded project.
    #[must_use]
    pub fn project_id(&self) -> Option<ProjectId> {
        self.store.project_id()
    }

    /// Selects project `id`; see [`RootSelector::select`].
    pub fn select(&self, id: ProjectId) -> JoinHandle<()> {
        self.selector.select(id)
    }

    /// Returns the selector's state.
    #[must_use]
    pub fn state(&self) -> SelectorState {
        self.selector.state()
    }

    /// Returns the selector.
    #[must_use]
    pub fn selector(&self) -> &RootSelector {
        &self.selector
    }

    /// Returns the table facade.
    #[must_use]
    pub fn tables(&self) -> &TableFacade {
        &self.tables
    }

    /// Returns the column facade.
    #[must_use]
    pub fn columns(&self) -> &ColumnFacade {
        &self.columns
    }

    /// Returns the generator setting facade.
    #[must_use]
    pub fn generators(&self) -> &GeneratorFacade {
        &self.generators
    }

    /// Returns the data source facade.
    #[must_use]
    pub fn data_sources(&self) -> &DataSourceFacade {
        &self.data_sources
    }

    /// Returns the generator catalog.
    #[must_use]
    pub fn catalog(&self) -> &GeneratorCatalog {
        &self.catalog
    }

    /// Returns the project list, patched with every committed project.
    #[must_use]
    pub fn projects(&self) -> &ProjectList {
        &self.projects
    }

    /// Supersedes any in-flight project load.
    pub fn dispose(&self) {
        self.selector.dispose();
    }
}

impl fmt::Debug for ActiveProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveProject")
            .field("store", &self.store)
            .field("selector", &self.selector)
            .field("catalog", &self.catalog)
            .field("projects", &self.projects)
            .finish_non_exhaustive()
    }
}
