//! Generator settings: which generator fills a column, and with what parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use synthdata_foundation::{Error, GeneratorSettingId, ParamBag, ParamValue, Result};

/// Configuration of one generator within a table.
///
/// A setting may be referenced by a single column or, for multi-column
/// generators, by several columns of the same table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratorSetting {
    id: GeneratorSettingId,
    name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    params: ParamBag,
    #[cfg_attr(feature = "serde", serde(default))]
    null_frequency: f64,
}

impl GeneratorSetting {
    /// Creates a setting with no parameters and a null frequency of zero.
    #[must_use]
    pub fn new(id: GeneratorSettingId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            params: ParamBag::new(),
            null_frequency: 0.0,
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params = self.params.insert(name.into(), value.into());
        self
    }

    /// Sets the null frequency.
    #[must_use]
    pub fn with_null_frequency(mut self, null_frequency: f64) -> Self {
        self.null_frequency = null_frequency;
        self
    }

    /// Returns the setting id.
    #[must_use]
    pub fn id(&self) -> GeneratorSettingId {
        self.id
    }

    /// Returns the generator kind name (e.g. `FirstName`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter bag.
    #[must_use]
    pub fn params(&self) -> &ParamBag {
        &self.params
    }

    /// Returns a parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(&name.to_string())
    }

    /// Returns the fraction of generated values that are null.
    #[must_use]
    pub fn null_frequency(&self) -> f64 {
        self.null_frequency
    }

    /// Checks that the null frequency lies in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNullFrequency` otherwise (including NaN).
    pub fn validate(&self) -> Result<()> {
        if (0.0..=1.0).contains(&self.null_frequency) {
            Ok(())
        } else {
            Err(Error::invalid_null_frequency(self.id, self.null_frequency))
        }
    }

    /// Returns a copy with the parameter bag replaced.
    #[must_use]
    pub fn with_params(&self, params: ParamBag) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            params,
            null_frequency: self.null_frequency,
        }
    }

    /// Returns a copy using a different generator kind.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            id: self.id,
            name: name.into(),
            params: self.params.clone(),
            null_frequency: self.null_frequency,
        }
    }
}
