//! Identifiers, parameter values, and persistent collections for synthdata.
//!
//! This crate provides:
//! - Typed entity identifiers ([`ProjectId`], [`TableId`], [`ColumnId`],
//!   [`GeneratorSettingId`], [`DataSourceId`], [`ConstraintId`])
//! - [`ColumnType`] - Declared value types of project columns
//! - [`ParamValue`] - Values held in a generator setting's parameter bag
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`SdVec`], [`SdMap`])

#![recursion_limit = "1024"]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod ids;
pub mod types;
pub mod value;

pub use collections::{SdMap, SdVec};
pub use error::{EntityRef, Error, ErrorContext, ErrorKind, RemoteError, Result};
pub use ids::{ColumnId, ConstraintId, DataSourceId, GeneratorSettingId, ProjectId, TableId};
pub use types::ColumnType;
pub use value::{ParamBag, ParamValue};
