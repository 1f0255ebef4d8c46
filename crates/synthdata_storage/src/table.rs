//! Tables: columns, their generator settings, and read-only constraints.

use std::collections::HashSet;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use synthdata_foundation::{
    ColumnId, ConstraintId, EntityRef, Error, GeneratorSettingId, Result, SdVec, TableId,
};

use crate::column::Column;
use crate::generator::GeneratorSetting;

/// A table of a project.
///
/// Invariants (checked by [`Table::validate`]):
/// - column ids are unique within the table
/// - generator setting ids are unique within the table
/// - every column's generator reference names a setting of this table
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Table {
    id: TableId,
    name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    columns: SdVec<Arc<Column>>,
    #[cfg_attr(feature = "serde", serde(default))]
    constraints: SdVec<Arc<Constraint>>,
    #[cfg_attr(feature = "serde", serde(default))]
    generator_settings: SdVec<Arc<GeneratorSetting>>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(id: TableId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            columns: SdVec::new(),
            constraints: SdVec::new(),
            generator_settings: SdVec::new(),
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns = self.columns.push_back(Arc::new(column));
        self
    }

    /// Appends a generator setting.
    #[must_use]
    pub fn with_generator_setting(mut self, setting: GeneratorSetting) -> Self {
        self.generator_settings = self.generator_settings.push_back(Arc::new(setting));
        self
    }

    /// Appends a constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints = self.constraints.push_back(Arc::new(constraint));
        self
    }

    /// Returns the table id.
    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in order.
    #[must_use]
    pub fn columns(&self) -> &SdVec<Arc<Column>> {
        &self.columns
    }

    /// Returns the constraints in order.
    #[must_use]
    pub fn constraints(&self) -> &SdVec<Arc<Constraint>> {
        &self.constraints
    }

    /// Returns the generator settings in order.
    #[must_use]
    pub fn generator_settings(&self) -> &SdVec<Arc<GeneratorSetting>> {
        &self.generator_settings
    }

    /// Finds a column by id (first match).
    #[must_use]
    pub fn find_column(&self, id: ColumnId) -> Option<&Arc<Column>> {
        self.columns.find(|c| c.id() == id)
    }

    /// Finds a generator setting by id (first match).
    #[must_use]
    pub fn find_generator_setting(&self, id: GeneratorSettingId) -> Option<&Arc<GeneratorSetting>> {
        self.generator_settings.find(|s| s.id() == id)
    }

    /// Resolves a column's weak generator reference against this table.
    #[must_use]
    pub fn setting_for(&self, column: &Column) -> Option<&Arc<GeneratorSetting>> {
        column
            .generator_setting_id()
            .and_then(|id| self.find_generator_setting(id))
    }

    /// Returns the columns referencing `setting`.
    pub fn columns_using(&self, setting: GeneratorSettingId) -> impl Iterator<Item = &Arc<Column>> {
        self.columns.iter().filter(move |c| c.uses_setting(setting))
    }

    /// Returns a copy with a new name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            id: self.id,
            name: name.into(),
            columns: self.columns.clone(),
            constraints: self.constraints.clone(),
            generator_settings: self.generator_settings.clone(),
        }
    }

    /// Returns a copy with the column list replaced.
    #[must_use]
    pub fn with_columns(&self, columns: SdVec<Arc<Column>>) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            columns,
            constraints: self.constraints.clone(),
            generator_settings: self.generator_settings.clone(),
        }
    }

    /// Returns a copy with the generator settings list replaced.
    #[must_use]
    pub fn with_generator_settings(&self, generator_settings: SdVec<Arc<GeneratorSetting>>) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            columns: self.columns.clone(),
            constraints: self.constraints.clone(),
            generator_settings,
        }
    }

    /// Returns a copy with both the columns and the settings replaced.
    ///
    /// Used by edits that must change both lists in one snapshot.
    #[must_use]
    pub fn with_columns_and_settings(
        &self,
        columns: SdVec<Arc<Column>>,
        generator_settings: SdVec<Arc<GeneratorSetting>>,
    ) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            columns,
            constraints: self.constraints.clone(),
            generator_settings,
        }
    }

    /// Checks id uniqueness, null frequencies and referential integrity.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        let mut settings = HashSet::new();
        for setting in &self.generator_settings {
            if !settings.insert(setting.id()) {
                return Err(Error::duplicate_id(EntityRef::GeneratorSetting(
                    self.id,
                    setting.id(),
                )));
            }
            setting.validate()?;
        }

        let mut columns = HashSet::new();
        for column in &self.columns {
            if !columns.insert(column.id()) {
                return Err(Error::duplicate_id(EntityRef::Column(self.id, column.id())));
            }
            if let Some(setting) = column.generator_setting_id() {
                if !settings.contains(&setting) {
                    return Err(Error::dangling_reference(self.id, column.id(), setting));
                }
            }
        }
        Ok(())
    }
}

/// Kind of a table constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConstraintType {
    /// Primary key.
    Primary,
    /// Foreign key.
    Foreign,
    /// Unique key.
    Unique,
    /// Check expression.
    Check,
}

/// A column referenced by a constraint.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnBrief {
    /// Column id.
    pub id: ColumnId,
    /// Column name.
    pub name: String,
}

/// A column in another table referenced by a foreign key.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnTableBrief {
    /// Column id.
    pub id: ColumnId,
    /// Table holding the column.
    pub table_id: TableId,
    /// Column name.
    pub name: String,
}

/// A schema constraint imported with a table.
///
/// Constraints are read-only on the client; transforms carry them along
/// untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraint {
    /// Constraint id.
    pub id: ConstraintId,
    /// Constraint name, if the schema named it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Constraint kind.
    pub constraint_type: ConstraintType,
    /// Columns of this table the constraint covers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub constrained_columns: Vec<ColumnBrief>,
    /// Referenced columns (foreign keys only).
    #[cfg_attr(feature = "serde", serde(default))]
    pub referenced_columns: Vec<ColumnTableBrief>,
    /// Check expression (check constraints only).
    #[cfg_attr(feature = "serde", serde(default))]
    pub check_expression: Option<String>,
}

impl Constraint {
    /// Creates a constraint with no columns.
    #[must_use]
    pub fn new(id: ConstraintId, constraint_type: ConstraintType) -> Self {
        Self {
            id,
            name: None,
            constraint_type,
            constrained_columns: Vec::new(),
            referenced_columns: Vec::new(),
            check_expression: None,
        }
    }

    /// Adds a constrained column.
    #[must_use]
    pub fn on_column(mut self, id: ColumnId, name: impl Into<String>) -> Self {
        self.constrained_columns.push(ColumnBrief {
            id,
            name: name.into(),
        });
        self
    }
}
