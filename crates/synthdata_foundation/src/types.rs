//! Declared value types of project columns.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Declared value type of a column.
///
/// Generators may restrict themselves to one column type; see
/// `only_for_type` on generator metadata.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColumnType {
    /// 64-bit signed integer.
    Integer,
    /// Floating point or decimal number.
    Float,
    /// Boolean.
    Bool,
    /// Text.
    String,
    /// Timestamp.
    Datetime,
}

impl ColumnType {
    /// All column types, in declaration order.
    pub const ALL: [ColumnType; 5] = [
        Self::Integer,
        Self::Float,
        Self::Bool,
        Self::String,
        Self::Datetime,
    ];

    /// Returns the literal used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Datetime => "datetime",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| Error::unknown_column_type(s))
    }
}
