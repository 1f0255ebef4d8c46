//! Catalog of the generator kinds offered by the server.
//!
//! The catalog caches the last list fetched by [`GeneratorCatalog::refresh`]
//! and answers lookups synchronously from that cache.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use synthdata_foundation::{ColumnType, ParamValue, Result, SdVec};
use synthdata_storage::{Column, GeneratorSetting};

use crate::remote::GeneratorSource;

/// Describes one parameter a generator kind accepts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratorParam {
    /// Parameter name, the key in a setting's parameter bag.
    pub name: String,
    /// Value type name as reported by the server.
    pub value_type: String,
    /// Allowed values, if the parameter is an enumeration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub allowed_values: Option<ParamValue>,
    /// Lower bound.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_value: Option<ParamValue>,
    /// Upper bound.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_value: Option<ParamValue>,
    /// Name of a parameter this one must be greater than or equal to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub greater_equal_than: Option<String>,
}

impl GeneratorParam {
    /// Creates an unconstrained parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
            allowed_values: None,
            min_value: None,
            max_value: None,
            greater_equal_than: None,
        }
    }
}

/// One generator kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratorInfo {
    /// Unique name, referenced by [`GeneratorSetting::name`].
    pub name: String,
    /// Display category.
    pub category: String,
    /// Restricts the generator to columns of one type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub only_for_type: Option<ColumnType>,
    /// Whether the generator can emit nulls.
    #[cfg_attr(feature = "serde", serde(default))]
    pub supports_null: bool,
    /// Whether one setting may feed several columns.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_multi_column: bool,
    /// Accepted parameters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub param_list: Vec<GeneratorParam>,
}

impl GeneratorInfo {
    /// Creates a single-column generator for any type, without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            only_for_type: None,
            supports_null: false,
            is_multi_column: false,
            param_list: Vec::new(),
        }
    }

    /// Restricts the generator to one column type.
    #[must_use]
    pub fn for_type(mut self, col_type: ColumnType) -> Self {
        self.only_for_type = Some(col_type);
        self
    }

    /// Marks the generator as multi-column.
    #[must_use]
    pub fn multi_column(mut self) -> Self {
        self.is_multi_column = true;
        self
    }

    /// Marks the generator as able to emit nulls.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.supports_null = true;
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_param(mut self, param: GeneratorParam) -> Self {
        self.param_list.push(param);
        self
    }

    /// Returns true if the generator can fill a column of `col_type`.
    #[must_use]
    pub fn suits(&self, col_type: ColumnType) -> bool {
        self.only_for_type.is_none_or(|only| only == col_type)
    }
}

#[derive(Default)]
struct Snapshot {
    items: Vec<Arc<GeneratorInfo>>,
    by_name: HashMap<String, Arc<GeneratorInfo>>,
}

impl Snapshot {
    fn new(items: Vec<GeneratorInfo>) -> Self {
        let items: Vec<_> = items.into_iter().map(Arc::new).collect();
        let by_name = items
            .iter()
            .map(|g| (g.name.clone(), Arc::clone(g)))
            .collect();
        Self { items, by_name }
    }
}

/// Generators grouped by category, in category order.
pub type GeneratorsByCategory = BTreeMap<String, Vec<Arc<GeneratorInfo>>>;

/// Cached list of generator kinds.
pub struct GeneratorCatalog {
    source: Arc<dyn GeneratorSource>,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl GeneratorCatalog {
    /// Creates an empty catalog. Call [`refresh`](Self::refresh) to fill it.
    pub fn new(source: Arc<dyn GeneratorSource>) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Fetches the generator list and replaces the cache.
    ///
    /// Returns the number of generators now cached.
    ///
    /// # Errors
    ///
    /// Returns the source's error; the cache is left as it was.
    pub async fn refresh(&self) -> Result<usize> {
        let items = self.source.list_generators().await?;
        let snapshot = Arc::new(Snapshot::new(items));
        let count = snapshot.items.len();
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
        debug!(generators = count, "generator catalog refreshed");
        Ok(count)
    }

    /// Returns every cached generator in server order.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<GeneratorInfo>> {
        self.snapshot().items.clone()
    }

    /// Returns the generator named `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Arc<GeneratorInfo>> {
        self.snapshot().by_name.get(name).cloned()
    }

    /// Returns true if `name` is a known multi-column generator.
    #[must_use]
    pub fn is_multi_column(&self, name: &str) -> bool {
        self.by_name(name).is_some_and(|g| g.is_multi_column)
    }

    /// Returns the generators able to fill `column`.
    #[must_use]
    pub fn for_column(&self, column: &Column) -> Vec<Arc<GeneratorInfo>> {
        self.snapshot()
            .items
            .iter()
            .filter(|g| g.suits(column.col_type()))
            .cloned()
            .collect()
    }

    /// Returns the generators able to fill `column`, grouped by category.
    #[must_use]
    pub fn for_column_by_category(&self, column: &Column) -> GeneratorsByCategory {
        let mut grouped = GeneratorsByCategory::new();
        for generator in self.for_column(column) {
            grouped
                .entry(generator.category.clone())
                .or_default()
                .push(generator);
        }
        grouped
    }

    /// Returns the settings whose generator is multi-column.
    #[must_use]
    pub fn multi_column_settings(
        &self,
        settings: &SdVec<Arc<GeneratorSetting>>,
    ) -> Vec<Arc<GeneratorSetting>> {
        let snapshot = self.snapshot();
        let multi: HashSet<&str> = snapshot
            .items
            .iter()
            .filter(|g| g.is_multi_column)
            .map(|g| g.name.as_str())
            .collect();
        settings
            .iter()
            .filter(|s| multi.contains(s.name()))
            .cloned()
            .collect()
    }
}

impl fmt::Debug for GeneratorCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorCatalog")
            .field("generators", &self.snapshot().items.len())
            .finish_non_exhaustive()
    }
}
