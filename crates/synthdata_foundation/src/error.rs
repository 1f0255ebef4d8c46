//! Error types for synthdata.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::ids::{ColumnId, DataSourceId, GeneratorSettingId, ProjectId, TableId};

/// Result type alias using the synthdata [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for synthdata operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a duplicate id error.
    #[must_use]
    pub fn duplicate_id(entity: EntityRef) -> Self {
        Self::new(ErrorKind::DuplicateId(entity))
    }

    /// Creates a dangling generator reference error.
    #[must_use]
    pub fn dangling_reference(
        table: TableId,
        column: ColumnId,
        setting: GeneratorSettingId,
    ) -> Self {
        Self::new(ErrorKind::DanglingGeneratorReference {
            table,
            column,
            setting,
        })
    }

    /// Creates an out-of-range null frequency error.
    #[must_use]
    pub fn invalid_null_frequency(setting: GeneratorSettingId, value: f64) -> Self {
        Self::new(ErrorKind::InvalidNullFrequency { setting, value })
    }

    /// Creates an unknown column type error.
    #[must_use]
    pub fn unknown_column_type(literal: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownColumnType(literal.into()))
    }

    /// Creates an error for an operation that needs an active project.
    #[must_use]
    pub fn no_active_project() -> Self {
        Self::new(ErrorKind::NoActiveProject)
    }

    /// Returns the remote error if this error came from a collaborator.
    #[must_use]
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match &self.kind {
            ErrorKind::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        Self::new(ErrorKind::Remote(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Two entities of the same kind share an id within one parent.
    #[error("duplicate id: {0}")]
    DuplicateId(EntityRef),

    /// A column references a generator setting its table does not hold.
    #[error("dangling generator reference: {column} in {table} points to missing {setting}")]
    DanglingGeneratorReference {
        /// The table holding the column.
        table: TableId,
        /// The column with the reference.
        column: ColumnId,
        /// The missing setting.
        setting: GeneratorSettingId,
    },

    /// A generator setting's null frequency lies outside `[0, 1]`.
    #[error("null frequency {value} of {setting} is outside [0, 1]")]
    InvalidNullFrequency {
        /// The offending setting.
        setting: GeneratorSettingId,
        /// The value found.
        value: f64,
    },

    /// A column type literal was not recognised.
    #[error("unknown column type: {0}")]
    UnknownColumnType(String),

    /// The operation needs an active project but none is loaded.
    #[error("no active project")]
    NoActiveProject,

    /// A remote collaborator failed.
    #[error("remote error: {0}")]
    Remote(RemoteError),
}

/// Failure reported by a remote loader or writer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The requested entity does not exist on the server.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server refused the request (validation, permissions).
    #[error("rejected: {0}")]
    Rejected(String),

    /// The request never produced a server answer.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Reference to an entity by kind and id, used in error reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntityRef {
    /// A project.
    Project(ProjectId),
    /// A table.
    Table(TableId),
    /// A column within a table.
    Column(TableId, ColumnId),
    /// A generator setting within a table.
    GeneratorSetting(TableId, GeneratorSettingId),
    /// A data source.
    DataSource(DataSourceId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project(id) => write!(f, "{id}"),
            Self::Table(id) => write!(f, "{id}"),
            Self::Column(table, id) => write!(f, "{id} in {table}"),
            Self::GeneratorSetting(table, id) => write!(f, "{id} in {table}"),
            Self::DataSource(id) => write!(f, "{id}"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that failed (e.g. `create_column`).
    pub operation: Option<String>,
    /// The project that was active.
    pub project: Option<ProjectId>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the active project.
    #[must_use]
    pub fn with_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
        }
        if let Some(project) = self.project {
            if self.operation.is_some() {
                write!(f, " ")?;
            }
            write!(f, "of {project}")?;
        }
        Ok(())
    }
}
