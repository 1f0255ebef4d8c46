//! synthdata - Client-side state for synthetic test data projects
//!
//! This crate re-exports all layers of the synthdata system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: synthdata_runtime    - Project selection, edit facades, generator catalog
//! Layer 1: synthdata_storage    - Entity tree, cascading transforms, root store
//! Layer 0: synthdata_foundation - Core types (ids, ParamValue, Error, collections)
//! ```

#![recursion_limit = "1024"]

pub use synthdata_foundation as foundation;
pub use synthdata_runtime as runtime;
pub use synthdata_storage as storage;
