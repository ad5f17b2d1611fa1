//! Typed extraction settings for Paralin.
//!
//! This crate holds the knobs that shape every extraction pipeline:
//! - how the `length` and `range` rules measure a value ([`LengthUnit`])
//! - the largest form body that will be decoded
//! - whether values are trimmed before validation
//!
//! Settings are layered: defaults → TOML/JSON → environment variables.
//!
//! # Example
//!
//! ```
//! use paralin_config::{ConfigLoader, LengthUnit};
//!
//! # fn main() -> Result<(), paralin_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_string("length_unit = \"utf16\"\nmax_form_body_bytes = 65536", "toml")?
//!     .with_env_prefix("PARALIN")
//!     .load()?;
//!
//! assert_eq!(config.length_unit, LengthUnit::Utf16);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! length_unit = "chars"        # chars | bytes | utf16
//! max_form_body_bytes = 1048576
//! trim = true
//! ```

#![doc(html_root_url = "https://docs.rs/paralin-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{ExtractConfig, ExtractConfigBuilder, LengthUnit, DEFAULT_MAX_FORM_BODY_BYTES};
pub use error::ConfigError;
pub use loader::ConfigLoader;
