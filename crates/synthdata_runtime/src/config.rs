//! Configuration for the active-project selector.

/// Configuration for [`RootSelector`](crate::RootSelector).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Selecting the id that is already loaded fetches it again.
    ///
    /// When false, such a select is a no-op.
    pub reload_same_id: bool,

    /// Loaded projects must pass `Project::validate` before they are
    /// committed; failures go to the error sink.
    pub validate_on_load: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            reload_same_id: true,
            validate_on_load: true,
        }
    }
}

impl SelectorConfig {
    /// Creates a configuration that commits whatever the server returns.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            validate_on_load: false,
            ..Self::default()
        }
    }

    /// Builder method to set same-id reloading.
    #[must_use]
    pub fn with_reload_same_id(mut self, reload: bool) -> Self {
        self.reload_same_id = reload;
        self
    }

    /// Builder method to set validation of loaded projects.
    #[must_use]
    pub fn with_validate_on_load(mut self, validate: bool) -> Self {
        self.validate_on_load = validate;
        self
    }
}
