//! Extraction settings.
//!
//! This module provides [`ExtractConfig`], the settings consulted by every
//! extraction pipeline, and [`LengthUnit`], which decides how the `length`
//! and `range` rules measure a value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// Default maximum form body size (1 MB).
pub const DEFAULT_MAX_FORM_BODY_BYTES: usize = 1024 * 1024;

/// Unit used when measuring the length of an extracted value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Unicode scalar values (`str::chars`).
    #[default]
    Chars,
    /// UTF-8 encoded bytes (`str::len`).
    Bytes,
    /// UTF-16 code units, as counted by JVM and JavaScript strings.
    Utf16,
}

impl LengthUnit {
    /// Measures `value` in this unit.
    ///
    /// # Example
    ///
    /// ```
    /// use paralin_config::LengthUnit;
    ///
    /// assert_eq!(LengthUnit::Chars.measure("héllo"), 5);
    /// assert_eq!(LengthUnit::Bytes.measure("héllo"), 6);
    /// assert_eq!(LengthUnit::Utf16.measure("🦀"), 2);
    /// ```
    #[must_use]
    pub fn measure(self, value: &str) -> usize {
        match self {
            Self::Chars => value.chars().count(),
            Self::Bytes => value.len(),
            Self::Utf16 => value.encode_utf16().count(),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chars => write!(f, "chars"),
            Self::Bytes => write!(f, "bytes"),
            Self::Utf16 => write!(f, "utf16"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chars" => Ok(Self::Chars),
            "bytes" => Ok(Self::Bytes),
            "utf16" | "utf-16" => Ok(Self::Utf16),
            other => Err(ConfigError::invalid_value(
                "length_unit",
                format!("unknown length unit '{other}', expected chars, bytes or utf16"),
            )),
        }
    }
}

/// Settings shared by every extraction.
///
/// # Example
///
/// ```
/// use paralin_config::{ExtractConfig, LengthUnit};
///
/// let config = ExtractConfig::default();
/// assert_eq!(config.length_unit, LengthUnit::Chars);
/// assert!(config.trim);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    /// Unit used by the `length` and `range` rules.
    #[serde(default)]
    pub length_unit: LengthUnit,

    /// Form bodies larger than this are treated as carrying no parameters.
    #[serde(default = "default_max_form_body_bytes")]
    pub max_form_body_bytes: usize,

    /// Strip leading and trailing whitespace before validation.
    #[serde(default = "default_trim")]
    pub trim: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            length_unit: LengthUnit::default(),
            max_form_body_bytes: default_max_form_body_bytes(),
            trim: default_trim(),
        }
    }
}

fn default_max_form_body_bytes() -> usize {
    DEFAULT_MAX_FORM_BODY_BYTES
}

fn default_trim() -> bool {
    true
}

impl ExtractConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use paralin_config::{ExtractConfig, LengthUnit};
    ///
    /// let config = ExtractConfig::builder()
    ///     .length_unit(LengthUnit::Utf16)
    ///     .max_form_body_bytes(64 * 1024)
    ///     .build();
    ///
    /// assert_eq!(config.length_unit, LengthUnit::Utf16);
    /// assert_eq!(config.max_form_body_bytes, 65536);
    /// ```
    #[must_use]
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `max_form_body_bytes` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_form_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "max_form_body_bytes",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Builder for [`ExtractConfig`].
#[derive(Debug, Default)]
pub struct ExtractConfigBuilder {
    config: ExtractConfig,
}

impl ExtractConfigBuilder {
    /// Creates a builder seeded with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the length unit.
    #[must_use]
    pub fn length_unit(mut self, unit: LengthUnit) -> Self {
        self.config.length_unit = unit;
        self
    }

    /// Sets the maximum form body size.
    #[must_use]
    pub fn max_form_body_bytes(mut self, limit: usize) -> Self {
        self.config.max_form_body_bytes = limit;
        self
    }

    /// Enables or disables whitespace trimming.
    #[must_use]
    pub fn trim(mut self, trim: bool) -> Self {
        self.config.trim = trim;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ExtractConfig {
        self.config
    }
}
