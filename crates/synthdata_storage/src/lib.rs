//! Project entity model, tree transforms, and the active-project root store.
//!
//! This crate provides:
//! - [`Project`], [`Table`], [`Column`], [`GeneratorSetting`], [`DataSource`] -
//!   Immutable entity snapshots sharing structure through `Arc` nodes
//! - [`transform`] - Pure cascading updates over an optional project root
//! - [`RootStore`] - The single owner of the current root, with observers

#![recursion_limit = "1024"]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod column;
pub mod data_source;
pub mod generator;
pub mod project;
pub mod store;
pub mod table;
pub mod transform;

pub use column::Column;
pub use data_source::{DataSource, DataSourceKind};
pub use generator::GeneratorSetting;
pub use project::Project;
pub use store::{FnObserver, Observer, RootStore, SubscriptionId};
pub use table::{ColumnBrief, ColumnTableBrief, Constraint, ConstraintType, Table};
pub use transform::Root;
