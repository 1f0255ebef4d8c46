//! Active-project selection and server-backed edits for synthdata.
//!
//! This crate provides:
//! - [`remote`] - Async traits for the server collaborators, and their request bodies
//! - [`RootSelector`] - Loads the selected project, discarding superseded loads
//! - [`facade`] - Table, column, generator setting and data source edits
//! - [`GeneratorCatalog`] - Cached generator kinds and column-type filtering
//! - [`ProjectList`] - Cached project list, kept in step with the active project
//! - [`ActiveProject`] - A session bundling one store with all of the above
//! - [`InMemoryServer`] - A complete in-process server for tests and demos

#![recursion_limit = "1024"]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod config;
pub mod facade;
pub mod memory;
pub mod project_list;
pub mod remote;
pub mod selector;
pub mod session;

pub use catalog::{GeneratorCatalog, GeneratorInfo, GeneratorParam, GeneratorsByCategory};
pub use config::SelectorConfig;
pub use facade::{ColumnFacade, DataSourceFacade, GeneratorFacade, TableFacade};
pub use memory::InMemoryServer;
pub use project_list::ProjectList;
pub use remote::{
    ColumnCreate, ColumnWrite, ColumnWriter, DataSourceWriter, DatabaseCreate, DatabaseParams,
    DatabaseWrite, ErrorSink, FileUpload, GeneratorSettingCreate, GeneratorSettingWrite,
    GeneratorSettingWriter, GeneratorSource, ProjectLister, ProjectListing, ProjectLoader,
    RemoteResult, TableCreate, TableWrite, TableWriter,
};
pub use selector::{RootSelector, SelectorState};
pub use session::ActiveProject;
