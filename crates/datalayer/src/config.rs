//! # Configuration
//!
//! Record behaviour is configured through [`RecordConfig`], loaded by
//! [`confique`] from environment variables layered over a TOML file layered
//! over compiled defaults.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `strict_attributes` | `DATALAYER_STRICT_ATTRIBUTES` | `false` | Reject writes to undeclared attributes |
//! | `cache_resolved` | `DATALAYER_CACHE_RESOLVED` | `true` | Cache values resolved from the layers |
//!
//! ## Example
//!
//! ```toml
//! strict_attributes = true
//! cache_resolved = false
//! ```

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Config, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordConfig {
    /// Writes to names the class does not declare fail with `UnknownAttribute`.
    #[config(default = false, env = "DATALAYER_STRICT_ATTRIBUTES")]
    pub strict_attributes: bool,

    /// Keep values resolved from the layers until the next layer change.
    /// Defaults are never cached either way.
    #[config(default = true, env = "DATALAYER_CACHE_RESOLVED")]
    pub cache_resolved: bool,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            strict_attributes: false,
            cache_resolved: true,
        }
    }
}

impl RecordConfig {
    /// Load from the environment and `path`, falling back to defaults.
    ///
    /// A missing file is not an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::builder().env().file(path.as_ref()).load()?)
    }

    pub fn strict(mut self) -> Self {
        self.strict_attributes = true;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache_resolved = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RecordConfig::default();
        assert!(!config.strict_attributes);
        assert!(config.cache_resolved);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("datalayer.toml");
        fs::write(&path, "strict_attributes = true\ncache_resolved = false\n").unwrap();

        let config = RecordConfig::load(&path).unwrap();
        assert!(config.strict_attributes);
        assert!(!config.cache_resolved);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = RecordConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, RecordConfig::default());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = RecordConfig::default().strict().without_cache();
        let rendered = toml::to_string(&config).unwrap();
        let parsed: RecordConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
