//! Integration tests for Layer 2: Runtime
//!
//! Tests for project selection, server-backed edits, and the generator
//! catalog, all against the in-memory server.

#![recursion_limit = "1024"]

mod editing;

use std::sync::{Arc, Mutex};

use synthdata_foundation::{ColumnId, ColumnType, Error, ProjectId, TableId};
use synthdata_runtime::{ErrorSink, GeneratorInfo, InMemoryServer};
use synthdata_storage::{Column, Project, Table};

pub const LIBRARY: ProjectId = ProjectId(3);
pub const AUTHOR: TableId = TableId(26);
pub const FIRST_NAME: ColumnId = ColumnId(126);

/// The library project: table "author" with a "first_name" column.
pub fn library() -> Project {
    Project::new(LIBRARY, "library").with_table(
        Table::new(AUTHOR, "author")
            .with_column(Column::new(FIRST_NAME, "first_name", ColumnType::String))
            .with_column(Column::new(ColumnId::new(127), "born", ColumnType::Datetime).nullable(true)),
    )
}

/// A server holding the library project and a few generator kinds.
pub fn server() -> Arc<InMemoryServer> {
    Arc::new(
        InMemoryServer::new()
            .with_project(library())
            .with_project(Project::new(ProjectId::new(4), "shop"))
            .with_generator(GeneratorInfo::new("FirstName", "person").for_type(ColumnType::String))
            .with_generator(GeneratorInfo::new("LastName", "person").for_type(ColumnType::String))
            .with_generator(GeneratorInfo::new("FullName", "person").multi_column())
            .with_generator(GeneratorInfo::new("DateTime", "time").for_type(ColumnType::Datetime))
            .with_generator(GeneratorInfo::new("Null", "basic").nullable()),
    )
}

/// Collects the messages of every reported error.
#[derive(Clone, Default)]
pub struct Reported(Arc<Mutex<Vec<String>>>);

impl Reported {
    pub fn sink(&self) -> Arc<dyn ErrorSink> {
        let messages = Arc::clone(&self.0);
        Arc::new(move |err: &Error| messages.lock().unwrap().push(err.to_string()))
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}
