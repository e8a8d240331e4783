//! Cursor loader configuration.
//!
//! One value per broadcasting session, handed to
//! [`CursorLoader::with_config`](crate::CursorLoader::with_config).
//! Missing fields fall back to their defaults.

use crate::error::{CursorError, CursorResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for a [`CursorLoader`](crate::CursorLoader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Keep decoded cursors keyed by handle between lookups.
    pub caching_enabled: bool,

    /// Decode the well-known system cursors when the loader is created.
    pub preload_system_cursors: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            caching_enabled: true,
            preload_system_cursors: false,
        }
    }
}

impl LoaderConfig {
    pub fn from_json(json: &str) -> CursorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> CursorResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CursorError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json(&text)?;
        log::debug!("[CONFIG] Loaded {:?} from {}", config, path.display());
        Ok(config)
    }
}
