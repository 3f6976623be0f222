//! `covidx` Configuration Module
//!
//! Provides configuration file support via `covidx.toml` and environment
//! variables.
//!
//! # Priority (highest to lowest)
//!
//! 1. Environment variables (`COVIDX_*`, nested keys split on `__`, e.g.
//!    `COVIDX_CODEC__INDEX_FAMILY`)
//! 2. Configuration file (`covidx.toml`)
//! 3. Default values
//!
//! ```toml
//! [codec]
//! index_family = "ROW"
//! qualifier_separator = ":"
//!
//! [logging]
//! level = "info"
//! format = "text"
//!
//! [[groups]]
//! table = "users_by_name"
//! columns = ["info:name", "tags:"]
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::column::CoveredColumn;
use crate::group::ColumnGroup;
use crate::projection::{IndexWriteLayout, DEFAULT_QUALIFIER_SEPARATOR, INDEX_ROW_FAMILY};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "covidx.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },

    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Index write layout section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Family of index-table columns.
    pub index_family: String,
    /// Separator between covered family and qualifier, one ASCII character.
    pub qualifier_separator: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            index_family: INDEX_ROW_FAMILY.to_string(),
            qualifier_separator: char::from(DEFAULT_QUALIFIER_SEPARATOR).to_string(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
    /// Log format: text or json.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// One column group declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Index table written by the group.
    pub table: String,
    /// Covered columns as `family:qualifier`, `family:` for every qualifier.
    pub columns: Vec<String>,
}

/// Main `covidx` configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CovidxConfig {
    /// Index write layout.
    pub codec: CodecConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Column groups, in registration order.
    pub groups: Vec<GroupConfig>,
}

impl CovidxConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file is not an error; defaults and environment apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("COVIDX_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Loads configuration from a file that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if `path` does not exist.
    pub fn load_existing<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        Self::load_from_path(path)
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.codec.index_family.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "codec.index_family".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        self.separator_byte()?;

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        for (index, group) in self.groups.iter().enumerate() {
            if group.table.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: format!("groups[{index}].table"),
                    message: "must not be empty".to_string(),
                });
            }
            if group.columns.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: format!("groups[{index}].columns"),
                    message: "must list at least one column".to_string(),
                });
            }
            for (column_index, column) in group.columns.iter().enumerate() {
                CoveredColumn::parse(column).map_err(|e| ConfigError::InvalidValue {
                    key: format!("groups[{index}].columns[{column_index}]"),
                    message: e.to_string(),
                })?;
            }
        }

        Ok(())
    }

    /// Index write layout described by the `[codec]` section.
    ///
    /// # Errors
    ///
    /// Returns an error if the separator is not a single ASCII character.
    pub fn layout(&self) -> Result<IndexWriteLayout, ConfigError> {
        Ok(IndexWriteLayout {
            family: self.codec.index_family.clone().into_bytes().into(),
            separator: self.separator_byte()?,
        })
    }

    /// Column groups declared under `[[groups]]`, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if a group is empty or a column cannot be parsed.
    pub fn column_groups(&self) -> crate::error::Result<Vec<ColumnGroup>> {
        self.groups
            .iter()
            .map(|group| {
                let columns = group
                    .columns
                    .iter()
                    .map(|column| CoveredColumn::parse(column))
                    .collect::<crate::error::Result<Vec<_>>>()?;
                ColumnGroup::new(group.table.clone(), columns)
            })
            .collect()
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn separator_byte(&self) -> Result<u8, ConfigError> {
        match self.codec.qualifier_separator.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(ConfigError::InvalidValue {
                key: "codec.qualifier_separator".to_string(),
                message: format!(
                    "value '{}' must be a single ASCII character",
                    self.codec.qualifier_separator
                ),
            }),
        }
    }
}
