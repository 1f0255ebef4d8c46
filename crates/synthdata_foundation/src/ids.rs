//! Typed identifiers for server-owned entities.
//!
//! Every entity kind gets its own newtype so a table id can never be passed
//! where a column id is expected. Ids are assigned by the server and are only
//! ever read by the client.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
        pub struct $name(pub u64);

        impl $name {
            /// Creates an id from its raw server value.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw server value.
            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a project, the root of the entity tree.
    ProjectId,
    "Project"
);

define_id!(
    /// Identifier of a table, unique within its project.
    TableId,
    "Table"
);

define_id!(
    /// Identifier of a column, unique within its table.
    ColumnId,
    "Column"
);

define_id!(
    /// Identifier of a generator setting, unique within its table.
    GeneratorSettingId,
    "GeneratorSetting"
);

define_id!(
    /// Identifier of a data source, unique within its project.
    DataSourceId,
    "DataSource"
);

define_id!(
    /// Identifier of a table constraint.
    ConstraintId,
    "Constraint"
);
