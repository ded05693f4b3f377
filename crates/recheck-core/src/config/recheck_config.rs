//! Top-level recheck configuration with 3-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::SelectionConfig;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`RECHECK_*`)
/// 2. Project config (`recheck.toml` in project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecheckConfig {
    pub selection: SelectionConfig,
}

impl RecheckConfig {
    /// Load configuration with 3-layer resolution.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join("recheck.toml");
        if project_config_path.exists() {
            config = Self::from_toml_file(&project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn apply_env_overrides(config: &mut Self) {
        if let Ok(v) = std::env::var("RECHECK_DEBUG") {
            config.selection.debug = Some(v == "1" || v.eq_ignore_ascii_case("true"));
        }
        if let Ok(v) = std::env::var("RECHECK_TIME_LIMIT_MS") {
            if let Ok(ms) = v.parse::<u64>() {
                config.selection.time_limit_ms = Some(ms);
            }
        }
        if let Ok(v) = std::env::var("RECHECK_DEFINITION_LEVEL") {
            config.selection.definition_level = Some(v == "1" || v.eq_ignore_ascii_case("true"));
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(0) = self.selection.time_limit_ms {
            return Err(ConfigError::InvalidValue {
                field: "selection.time_limit_ms".to_string(),
                message: "budget of 0 ms would always fall back; omit the field to disable"
                    .to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_project_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recheck.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[selection]\ntime_limit_ms = 500\ndebug = true").unwrap();

        let config = RecheckConfig::load(dir.path()).unwrap();
        assert_eq!(config.selection.time_limit_ms, Some(500));
        assert!(config.selection.effective_debug());
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecheckConfig::load(dir.path()).unwrap();
        assert!(config.selection.effective_definition_level());
    }

    #[test]
    fn zero_time_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recheck.toml");
        std::fs::write(&path, "[selection]\ntime_limit_ms = 0\n").unwrap();

        let err = RecheckConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recheck.toml");
        std::fs::write(&path, "[selection\n").unwrap();

        let err = RecheckConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
