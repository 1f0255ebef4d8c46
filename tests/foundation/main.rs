//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: typed ids, ParamValue, ColumnType, Error, and
//! persistent collections.

#![recursion_limit = "1024"]

mod collections;
mod errors;
mod values;
