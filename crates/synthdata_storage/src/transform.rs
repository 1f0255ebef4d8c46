//! Cascading transforms over the project tree.
//!
//! Every function takes the current [`Root`] and returns the next one. None of
//! them perform I/O or fail:
//! - an absent root stays absent
//! - an id that is not found leaves the root unchanged, returning the very
//!   same `Arc` so the store can skip notifying observers
//! - an edit rebuilds only the path from the project down to the edited node;
//!   every sibling table, column, setting and data source keeps its `Arc`
//!
//! Lookups use the first entry with a matching id. Duplicate ids are rejected
//! by [`Project::validate`], not here.

use std::sync::Arc;

use tracing::trace;

use synthdata_foundation::{ColumnId, DataSourceId, GeneratorSettingId, SdVec, TableId};

use crate::column::Column;
use crate::data_source::DataSource;
use crate::generator::GeneratorSetting;
use crate::project::Project;
use crate::table::Table;

/// The value held by the root store: the active project, if any.
pub type Root = Option<Arc<Project>>;

/// Returns true if two roots are the same snapshot.
///
/// Identity, not structural equality: a transform that changed nothing hands
/// back the same `Arc`.
#[must_use]
pub fn same_root(a: &Root, b: &Root) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

/// Applies `f` to the project, keeping the root when `f` reports no change.
fn transform_project<F>(root: &Root, f: F) -> Root
where
    F: FnOnce(&Project) -> Option<Project>,
{
    let project = root.as_ref()?;
    match f(project) {
        Some(next) => Some(Arc::new(next)),
        None => root.clone(),
    }
}

/// Replaces the whole tree.
///
/// Used after server operations that answer with the full project (schema
/// import, cascading deletes).
#[must_use]
pub fn replace_root(project: impl Into<Arc<Project>>) -> Root {
    Some(project.into())
}

/// Replaces the table `table_id` with `f(table)`.
///
/// If the table is missing, or `f` returns the table it was given, the root
/// is returned unchanged.
#[must_use]
pub fn replace_table<F>(root: &Root, table_id: TableId, f: F) -> Root
where
    F: FnOnce(&Arc<Table>) -> Arc<Table>,
{
    transform_project(root, |project| {
        let Some(index) = project.tables().position(|t| t.id() == table_id) else {
            trace!(table = %table_id, "table not found; root unchanged");
            return None;
        };
        let current = project.tables().get(index)?;
        let next = f(current);
        if Arc::ptr_eq(current, &next) {
            return None;
        }
        let tables = project.tables().update(index, next)?;
        Some(project.with_tables(tables))
    })
}

/// Replaces the column `column_id` of table `table_id` with `f(column)`.
///
/// Same no-op rules as [`replace_table`], one level deeper.
#[must_use]
pub fn replace_column<F>(root: &Root, table_id: TableId, column_id: ColumnId, f: F) -> Root
where
    F: FnOnce(&Arc<Column>) -> Arc<Column>,
{
    replace_table(root, table_id, |table| {
        let Some(index) = table.columns().position(|c| c.id() == column_id) else {
            trace!(table = %table_id, column = %column_id, "column not found; table unchanged");
            return Arc::clone(table);
        };
        let Some(current) = table.columns().get(index) else {
            return Arc::clone(table);
        };
        let next = f(current);
        if Arc::ptr_eq(current, &next) {
            return Arc::clone(table);
        }
        match table.columns().update(index, next) {
            Some(columns) => Arc::new(table.with_columns(columns)),
            None => Arc::clone(table),
        }
    })
}

/// Appends a table to the project.
#[must_use]
pub fn add_table(root: &Root, table: Table) -> Root {
    transform_project(root, |project| {
        Some(project.with_tables(project.tables().push_back(Arc::new(table))))
    })
}

/// Replaces the table carrying `table`'s id with `table`.
#[must_use]
pub fn patch_table(root: &Root, table: Table) -> Root {
    replace_table(root, table.id(), |_| Arc::new(table))
}

/// Removes the table `table_id`.
#[must_use]
pub fn delete_table(root: &Root, table_id: TableId) -> Root {
    transform_project(root, |project| {
        let index = project.tables().position(|t| t.id() == table_id)?;
        Some(project.with_tables(project.tables().remove(index)?))
    })
}

/// Appends a column to table `table_id`.
#[must_use]
pub fn add_column(root: &Root, table_id: TableId, column: Column) -> Root {
    replace_table(root, table_id, |table| {
        Arc::new(table.with_columns(table.columns().push_back(Arc::new(column))))
    })
}

/// Replaces the column carrying `column`'s id in table `table_id`.
#[must_use]
pub fn patch_column(root: &Root, table_id: TableId, column: Column) -> Root {
    replace_column(root, table_id, column.id(), |_| Arc::new(column))
}

/// Removes column `column_id` from table `table_id`.
///
/// Generator settings stay in the table even if no column references them
/// any more.
#[must_use]
pub fn delete_column(root: &Root, table_id: TableId, column_id: ColumnId) -> Root {
    replace_table(root, table_id, |table| {
        let columns = table.columns().retain(|c| c.id() != column_id);
        if columns.len() == table.columns().len() {
            return Arc::clone(table);
        }
        Arc::new(table.with_columns(columns))
    })
}

/// Appends `setting` to table `table_id` and points column `column_id` at it.
///
/// Both edits land in one new root, so no observer ever sees the setting
/// without its column or the column referencing a missing setting. When the
/// column does not exist the setting is still added, unreferenced.
#[must_use]
pub fn add_generator_setting(
    root: &Root,
    table_id: TableId,
    column_id: ColumnId,
    setting: GeneratorSetting,
) -> Root {
    replace_table(root, table_id, |table| {
        let setting_id = setting.id();
        let settings = table.generator_settings().push_back(Arc::new(setting));
        let columns = match table.columns().position(|c| c.id() == column_id) {
            Some(index) => {
                let wired = table
                    .columns()
                    .get(index)
                    .map(|c| Arc::new(c.with_generator_setting(Some(setting_id))));
                wired
                    .and_then(|c| table.columns().update(index, c))
                    .unwrap_or_else(|| table.columns().clone())
            }
            None => {
                trace!(table = %table_id, column = %column_id, "column not found; setting added unreferenced");
                table.columns().clone()
            }
        };
        Arc::new(table.with_columns_and_settings(columns, settings))
    })
}

/// Replaces the generator setting carrying `setting`'s id in table `table_id`.
///
/// Columns hold the setting by id, so they are left untouched.
#[must_use]
pub fn patch_generator_setting(root: &Root, table_id: TableId, setting: GeneratorSetting) -> Root {
    replace_table(root, table_id, |table| {
        let Some(index) = table.generator_settings().position(|s| s.id() == setting.id()) else {
            trace!(table = %table_id, setting = %setting.id(), "setting not found; table unchanged");
            return Arc::clone(table);
        };
        match table.generator_settings().update(index, Arc::new(setting)) {
            Some(settings) => Arc::new(table.with_generator_settings(settings)),
            None => Arc::clone(table),
        }
    })
}

/// Removes generator setting `setting_id` from table `table_id` and clears
/// every column reference to it.
#[must_use]
pub fn delete_generator_setting(
    root: &Root,
    table_id: TableId,
    setting_id: GeneratorSettingId,
) -> Root {
    replace_table(root, table_id, |table| {
        let settings = table.generator_settings().retain(|s| s.id() != setting_id);
        let columns = clear_references(table.columns(), setting_id);
        let unchanged = settings.len() == table.generator_settings().len() && columns.is_none();
        if unchanged {
            return Arc::clone(table);
        }
        let columns = columns.unwrap_or_else(|| table.columns().clone());
        Arc::new(table.with_columns_and_settings(columns, settings))
    })
}

/// Clears references to `setting_id`, or returns `None` if no column had one.
fn clear_references(
    columns: &SdVec<Arc<Column>>,
    setting_id: GeneratorSettingId,
) -> Option<SdVec<Arc<Column>>> {
    let mut cleared: Option<SdVec<Arc<Column>>> = None;
    for (index, column) in columns.iter().enumerate() {
        if column.uses_setting(setting_id) {
            let base = cleared.as_ref().unwrap_or(columns);
            cleared = base.update(index, Arc::new(column.with_generator_setting(None)));
        }
    }
    cleared
}

/// Appends a data source to the project.
#[must_use]
pub fn add_data_source(root: &Root, data_source: DataSource) -> Root {
    transform_project(root, |project| {
        Some(project.with_data_sources(project.data_sources().push_back(Arc::new(data_source))))
    })
}

/// Replaces the data source carrying `data_source`'s id.
#[must_use]
pub fn patch_data_source(root: &Root, data_source: DataSource) -> Root {
    transform_project(root, |project| {
        let index = project
            .data_sources()
            .position(|d| d.id() == data_source.id())?;
        let sources = project.data_sources().update(index, Arc::new(data_source))?;
        Some(project.with_data_sources(sources))
    })
}

/// Removes data source `data_source_id`.
#[must_use]
pub fn delete_data_source(root: &Root, data_source_id: DataSourceId) -> Root {
    transform_project(root, |project| {
        let index = project.data_sources().position(|d| d.id() == data_source_id)?;
        Some(project.with_data_sources(project.data_sources().remove(index)?))
    })
}
