//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading extraction settings
//! from defaults, files, and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, ExtractConfig};

/// Configuration loader with layered approach.
///
/// Layers are applied in order, later ones overriding earlier ones:
/// 1. Default values
/// 2. Configuration file or string (TOML or JSON)
/// 3. Environment variables
///
/// # Example
///
/// ```no_run
/// use paralin_config::ConfigLoader;
///
/// # fn main() -> Result<(), paralin_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("paralin.toml")?
///     .with_env_prefix("PARALIN")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: ExtractConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader seeded with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to default values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = ExtractConfig::default();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen from the file extension (`.toml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed,
    /// or has an unsupported extension.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or `format` is neither
    /// `"toml"` nor `"json"`.
    ///
    /// # Example
    ///
    /// ```
    /// use paralin_config::{ConfigLoader, LengthUnit};
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(r#"length_unit = "bytes""#, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.length_unit, LengthUnit::Bytes);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };

        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Recognized variables, with prefix `PARALIN`:
    /// - `PARALIN__LENGTH_UNIT=utf16`
    /// - `PARALIN__MAX_FORM_BODY_BYTES=65536`
    /// - `PARALIN__TRIM=false`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Finalize and return the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment override cannot be parsed or
    /// the resulting configuration is invalid.
    pub fn load(mut self) -> Result<ExtractConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars: Vec<(String, String)> = env::vars()
                .filter(|(k, _)| k.starts_with(&prefix))
                .collect();

            for (key, value) in vars {
                self.apply_env_var(&key, &value, &prefix)?;
            }
        }

        self.config.validate()?;

        Ok(self.config)
    }

    fn parse_file(content: &str, path: &Path) -> Result<ExtractConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(field) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            // Shares the prefix but not the separator, e.g. PARALINX.
            return Ok(());
        };

        match field {
            "LENGTH_UNIT" => {
                self.config.length_unit = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected chars, bytes or utf16"))?;
            }
            "MAX_FORM_BODY_BYTES" => {
                self.config.max_form_body_bytes = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            "TRIM" => {
                self.config.trim = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            _ => {
                return Err(ConfigError::env_parse_error(key, "unknown configuration key"));
            }
        }

        Ok(())
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
