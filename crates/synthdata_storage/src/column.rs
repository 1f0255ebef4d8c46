//! Table columns.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use synthdata_foundation::{ColumnId, ColumnType, GeneratorSettingId};

/// A column of a table.
///
/// The generator reference is weak: it names a [`GeneratorSetting`] by id,
/// resolved against the owning table's settings list.
///
/// On the wire the server nests the whole setting under `generator_setting`;
/// only its `id` is kept.
///
/// [`GeneratorSetting`]: crate::GeneratorSetting
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ColumnView", into = "ColumnView"))]
pub struct Column {
    id: ColumnId,
    name: String,
    col_type: ColumnType,
    nullable: bool,
    generator_setting_id: Option<GeneratorSettingId>,
}

/// Server representation of a column.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct ColumnView {
    id: ColumnId,
    name: String,
    col_type: ColumnType,
    #[serde(default)]
    nullable: bool,
    #[serde(default)]
    generator_setting: Option<SettingRef>,
}

/// The part of a nested generator setting a column keeps.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct SettingRef {
    id: GeneratorSettingId,
}

#[cfg(feature = "serde")]
impl From<ColumnView> for Column {
    fn from(view: ColumnView) -> Self {
        Self {
            id: view.id,
            name: view.name,
            col_type: view.col_type,
            nullable: view.nullable,
            generator_setting_id: view.generator_setting.map(|s| s.id),
        }
    }
}

#[cfg(feature = "serde")]
impl From<Column> for ColumnView {
    fn from(column: Column) -> Self {
        Self {
            id: column.id,
            name: column.name,
            col_type: column.col_type,
            nullable: column.nullable,
            generator_setting: column.generator_setting_id.map(|id| SettingRef { id }),
        }
    }
}

impl Column {
    /// Creates a non-nullable column without a generator.
    #[must_use]
    pub fn new(id: ColumnId, name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            id,
            name: name.into(),
            col_type,
            nullable: false,
            generator_setting_id: None,
        }
    }

    /// Sets the nullability flag.
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Points the column at a generator setting.
    #[must_use]
    pub fn with_generator(mut self, setting: GeneratorSettingId) -> Self {
        self.generator_setting_id = Some(setting);
        self
    }

    /// Returns the column id.
    #[must_use]
    pub fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared value type.
    #[must_use]
    pub fn col_type(&self) -> ColumnType {
        self.col_type
    }

    /// Returns true if the column accepts nulls.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the referenced generator setting, if any.
    #[must_use]
    pub fn generator_setting_id(&self) -> Option<GeneratorSettingId> {
        self.generator_setting_id
    }

    /// Returns true if the column references `setting`.
    #[must_use]
    pub fn uses_setting(&self, setting: GeneratorSettingId) -> bool {
        self.generator_setting_id == Some(setting)
    }

    /// Returns a copy with the generator reference replaced.
    #[must_use]
    pub fn with_generator_setting(&self, setting: Option<GeneratorSettingId>) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            col_type: self.col_type,
            nullable: self.nullable,
            generator_setting_id: setting,
        }
    }

    /// Returns a copy with a new name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            id: self.id,
            name: name.into(),
            col_type: self.col_type,
            nullable: self.nullable,
            generator_setting_id: self.generator_setting_id,
        }
    }
}
