//! Projects: the root of the entity tree.

use std::collections::HashSet;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use synthdata_foundation::{
    ColumnId, DataSourceId, EntityRef, Error, ProjectId, Result, SdVec, TableId,
};

use crate::column::Column;
use crate::data_source::DataSource;
use crate::table::Table;

/// Immutable snapshot of a project.
///
/// Clone is cheap: tables and data sources are `Arc` nodes inside persistent
/// vectors. Copy constructors return a new `Project` that shares every list
/// they do not replace.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Project {
    id: ProjectId,
    name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    tables: SdVec<Arc<Table>>,
    #[cfg_attr(feature = "serde", serde(default))]
    data_sources: SdVec<Arc<DataSource>>,
}

impl Project {
    /// Creates an empty project.
    #[must_use]
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tables: SdVec::new(),
            data_sources: SdVec::new(),
        }
    }

    /// Appends a table.
    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables = self.tables.push_back(Arc::new(table));
        self
    }

    /// Appends a data source.
    #[must_use]
    pub fn with_data_source(mut self, data_source: DataSource) -> Self {
        self.data_sources = self.data_sources.push_back(Arc::new(data_source));
        self
    }

    /// Returns the project id.
    #[must_use]
    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tables in order.
    #[must_use]
    pub fn tables(&self) -> &SdVec<Arc<Table>> {
        &self.tables
    }

    /// Returns the data sources in order.
    #[must_use]
    pub fn data_sources(&self) -> &SdVec<Arc<DataSource>> {
        &self.data_sources
    }

    /// Finds a table by id (first match).
    #[must_use]
    pub fn find_table(&self, id: TableId) -> Option<&Arc<Table>> {
        self.tables.find(|t| t.id() == id)
    }

    /// Finds a column by table and column id.
    #[must_use]
    pub fn find_column(&self, table: TableId, column: ColumnId) -> Option<&Arc<Column>> {
        self.find_table(table)?.find_column(column)
    }

    /// Finds a data source by id (first match).
    #[must_use]
    pub fn find_data_source(&self, id: DataSourceId) -> Option<&Arc<DataSource>> {
        self.data_sources.find(|d| d.id() == id)
    }

    /// Returns a copy with a new name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            id: self.id,
            name: name.into(),
            tables: self.tables.clone(),
            data_sources: self.data_sources.clone(),
        }
    }

    /// Returns a copy with the table list replaced.
    #[must_use]
    pub fn with_tables(&self, tables: SdVec<Arc<Table>>) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            tables,
            data_sources: self.data_sources.clone(),
        }
    }

    /// Returns a copy with the data source list replaced.
    #[must_use]
    pub fn with_data_sources(&self, data_sources: SdVec<Arc<DataSource>>) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            tables: self.tables.clone(),
            data_sources,
        }
    }

    /// Checks id uniqueness across tables and data sources, then validates
    /// every table.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        let mut tables = HashSet::new();
        for table in &self.tables {
            if !tables.insert(table.id()) {
                return Err(Error::duplicate_id(EntityRef::Table(table.id())));
            }
            table.validate()?;
        }

        let mut sources = HashSet::new();
        for source in &self.data_sources {
            if !sources.insert(source.id()) {
                return Err(Error::duplicate_id(EntityRef::DataSource(source.id())));
            }
        }
        Ok(())
    }
}
