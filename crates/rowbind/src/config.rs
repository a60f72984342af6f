//! Adapter configuration.
//!
//! The only behavioral switch is whether rows are pre-initialized. With
//! `pre_initialize_views = false` (the default) the adapter reports an empty
//! data set until the value model first signals a change, and recycled rows
//! trust the presentation model's own notifications. With `true`, the data
//! set is visible immediately and every recycled row is force-refreshed.
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```
//! use rowbind::AdapterConfig;
//!
//! let config = AdapterConfig::from_toml_str("pre_initialize_views = true").unwrap();
//! assert!(config.pre_initialize_views);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for a [`DataSetAdapter`](crate::DataSetAdapter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Show data and eagerly refresh recycled rows without waiting for a
    /// change notification.
    pub pre_initialize_views: bool,
}

impl AdapterConfig {
    /// Configuration that defers population until the first change.
    pub fn lazy() -> Self {
        Self {
            pre_initialize_views: false,
        }
    }

    /// Configuration that populates immediately and force-refreshes rows.
    pub fn eager() -> Self {
        Self {
            pre_initialize_views: true,
        }
    }

    /// Set whether views are pre-initialized.
    pub fn with_pre_initialize_views(mut self, pre_initialize_views: bool) -> Self {
        self.pre_initialize_views = pre_initialize_views;
        self
    }

    /// Parse configuration from a TOML document.
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
