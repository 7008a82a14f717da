//! Checker configuration (`[check]` table)
//!
//! ```toml
//! [check]
//! disable = ["unreachable-code"]
//! deny = ["not-assignable"]
//! strict = false
//! workers = 4
//! info-pointers = true
//! ```

use crate::error::{WarningCode, WarningConfig};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A warning name no code is registered under
    #[error("Unknown warning '{0}'")]
    UnknownWarning(String),

    /// Zero workers requested
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Settings for one checking session
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    /// Which warnings are suppressed or escalated
    pub warnings: WarningConfig,
    /// Worker threads for [`crate::driver::TypeCheckerTask::check_all`]; `None` uses the CPU count
    pub workers: Option<usize>,
    /// Emit `ThisIsTheMethod` pointers after argument problems
    pub info_pointers: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            warnings: WarningConfig::default(),
            workers: None,
            info_pointers: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    check: CheckSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct CheckSection {
    #[serde(default)]
    disable: Vec<String>,
    #[serde(default)]
    deny: Vec<String>,
    #[serde(default)]
    strict: bool,
    #[serde(default)]
    workers: Option<usize>,
    #[serde(default = "default_info_pointers")]
    info_pointers: bool,
}

fn default_info_pointers() -> bool {
    true
}

impl Default for CheckSection {
    fn default() -> Self {
        CheckSection {
            disable: Vec::new(),
            deny: Vec::new(),
            strict: false,
            workers: None,
            info_pointers: default_info_pointers(),
        }
    }
}

impl CheckerConfig {
    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let section = file.check;

        if section.workers == Some(0) {
            return Err(ConfigError::ValidationError("workers must be at least 1".to_string()));
        }

        let warnings = WarningConfig {
            disabled: parse_codes(&section.disable)?.into_iter().collect(),
            deny: parse_codes(&section.deny)?.into_iter().collect(),
            strict: section.strict,
        };
        Ok(CheckerConfig {
            warnings,
            workers: section.workers,
            info_pointers: section.info_pointers,
        })
    }

    /// Worker count to use for `units` units
    pub fn worker_count(&self, units: usize) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).clamp(1, units.max(1))
    }
}

fn parse_codes(names: &[String]) -> Result<Vec<WarningCode>, ConfigError> {
    names
        .iter()
        .map(|name| WarningCode::from_name(name).ok_or_else(|| ConfigError::UnknownWarning(name.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CheckerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CheckerConfig::default());
        assert!(config.info_pointers);
    }

    #[test]
    fn test_check_section() {
        let config = CheckerConfig::from_toml_str(
            r#"
            [check]
            disable = ["unreachable-code", "this-is-the-method"]
            deny = ["not-assignable"]
            workers = 2
            info-pointers = false
            "#,
        )
        .unwrap();

        assert!(!config.warnings.is_enabled(WarningCode::UnreachableCode));
        assert!(!config.warnings.is_enabled(WarningCode::ThisIsTheMethod));
        assert!(config.warnings.is_denied(WarningCode::NotAssignable));
        assert!(!config.warnings.is_denied(WarningCode::MissingReturn));
        assert_eq!(config.workers, Some(2));
        assert!(!config.info_pointers);
    }

    #[test]
    fn test_strict() {
        let config = CheckerConfig::from_toml_str("[check]\nstrict = true\n").unwrap();
        assert!(config.warnings.is_denied(WarningCode::MissingReturn));
    }

    #[test]
    fn test_unknown_warning_name() {
        let result = CheckerConfig::from_toml_str("[check]\ndisable = [\"no-such-warning\"]\n");
        assert!(matches!(result, Err(ConfigError::UnknownWarning(name)) if name == "no-such-warning"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = CheckerConfig::from_toml_str("[check]\nverbose = true\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = CheckerConfig::from_toml_str("[check]\nworkers = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_worker_count_bounds() {
        let config = CheckerConfig { workers: Some(8), ..CheckerConfig::default() };
        assert_eq!(config.worker_count(3), 3);
        assert_eq!(config.worker_count(0), 1);
        let config = CheckerConfig { workers: Some(2), ..CheckerConfig::default() };
        assert_eq!(config.worker_count(10), 2);
    }
}
