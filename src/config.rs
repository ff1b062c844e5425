//! # Build configuration
//!
//! `BuildConfig` carries the three knobs of a tree build. It can be
//! deserialized from JSON, and any missing field takes its default:
//!
//! ```json
//! { "max_depth": 20, "min_segments": 10, "method": "score" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bsp::{SplitMethod, BSP_DEPTH_LIMIT, DEFAULT_MAX_DEPTH, DEFAULT_MIN_SEGMENTS};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Nodes at this depth become leaves regardless of their segment count.
    pub max_depth: usize,
    /// Lists with at most this many segments become leaves.
    pub min_segments: usize,
    pub method: SplitMethod,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            min_segments: DEFAULT_MIN_SEGMENTS,
            method: SplitMethod::default(),
        }
    }
}

impl BuildConfig {
    pub fn new(max_depth: usize, min_segments: usize, method: SplitMethod) -> Self {
        BuildConfig {
            max_depth,
            min_segments,
            method,
        }
    }

    /// Set the method from its name, failing on anything but `simple`/`score`.
    pub fn with_method_name(mut self, name: &str) -> Result<Self, ConfigError> {
        self.method = name.parse()?;
        Ok(self)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: BuildConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth > BSP_DEPTH_LIMIT {
            return Err(ConfigError::DepthLimit {
                requested: self.max_depth,
                limit: BSP_DEPTH_LIMIT,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.max_depth, 20);
        assert_eq!(config.min_segments, 10);
        assert_eq!(config.method, SplitMethod::Score);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = BuildConfig::from_json_str(r#"{ "min_segments": 2, "method": "simple" }"#).unwrap();
        assert_eq!(config, BuildConfig::new(20, 2, SplitMethod::Simple));
    }

    #[test]
    fn test_unknown_method_in_json_is_rejected() {
        let err = BuildConfig::from_json_str(r#"{ "method": "random" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_with_method_name() {
        let config = BuildConfig::default().with_method_name("simple").unwrap();
        assert_eq!(config.method, SplitMethod::Simple);
        assert!(matches!(
            BuildConfig::default().with_method_name("median"),
            Err(ConfigError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_depth_limit() {
        let err = BuildConfig::new(BSP_DEPTH_LIMIT + 1, 1, SplitMethod::Simple)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::DepthLimit { requested, .. } if requested == BSP_DEPTH_LIMIT + 1));
        assert!(BuildConfig::new(BSP_DEPTH_LIMIT, 1, SplitMethod::Simple).validate().is_ok());
    }
}
