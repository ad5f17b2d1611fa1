//! Extraction error types.
//!
//! A failed rule produces a [`Rejection`]. The builder turns it into a
//! [`ParamError`], either the default `Rejected` variant or, when the caller
//! registered a factory with `throw_as`, a `Custom` error of their own type.

use http::StatusCode;
use std::fmt;
use thiserror::Error;

use crate::ParamSource;

/// Why the validation pipeline refused a value.
///
/// Each kind carries a fixed message, which is also what the default error
/// displays and what a custom error factory receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// No raw value and no default.
    Missing,
    /// The value is empty after trimming.
    Empty,
    /// The `length` or `range` rule failed.
    InvalidSize,
    /// The split index, `contains`, `verify` or `matches` rule failed.
    InvalidValue,
}

impl Rejection {
    /// Returns the message for this rejection.
    ///
    /// ```rust
    /// use paralin::Rejection;
    ///
    /// assert_eq!(Rejection::Missing.message(), "missing");
    /// assert_eq!(Rejection::InvalidSize.message(), "invalid-size");
    /// ```
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Empty => "empty",
            Self::InvalidSize => "invalid-size",
            Self::InvalidValue => "invalid-value",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Error returned by the terminal conversion methods.
///
/// # Example
///
/// ```rust
/// use paralin::{Paralin, ParamError, ParamSource, Rejection, RequestContext};
/// use http::StatusCode;
///
/// let ctx = RequestContext::builder().build();
/// let err = Paralin::with(&ctx).query("page").as_string().unwrap_err();
///
/// assert_eq!(err.to_string(), "missing");
/// assert_eq!(err.rejection(), Some(Rejection::Missing));
/// assert_eq!(err.location(), Some(ParamSource::Query));
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum ParamError {
    /// The validation pipeline refused the value.
    #[error("{rejection}")]
    Rejected {
        /// Where the parameter was looked up.
        location: ParamSource,
        /// Parameter name.
        key: String,
        /// Which rule failed.
        rejection: Rejection,
    },

    /// The pipeline refused the value and a `throw_as` factory built this
    /// error from the rejection message.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),

    /// The `matches` pattern is not a valid regular expression.
    #[error("invalid match pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },

    /// The validated string could not be converted to the requested type.
    #[error("{location} parameter '{key}' is not a valid {target}: '{value}'")]
    Conversion {
        /// Where the parameter was looked up.
        location: ParamSource,
        /// Parameter name.
        key: String,
        /// Name of the requested type.
        target: &'static str,
        /// The validated string.
        value: String,
    },

    /// The validated string is not valid JSON for the requested type.
    #[error("failed to deserialize {location} parameter '{key}': {source}")]
    Deserialization {
        /// Where the parameter was looked up.
        location: ParamSource,
        /// Parameter name.
        key: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ParamError {
    /// Returns the rejection kind for default pipeline errors.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected { rejection, .. } => Some(*rejection),
            _ => None,
        }
    }

    /// Returns where the parameter was looked up, if known.
    #[must_use]
    pub fn location(&self) -> Option<ParamSource> {
        match self {
            Self::Rejected { location, .. }
            | Self::Conversion { location, .. }
            | Self::Deserialization { location, .. } => Some(*location),
            Self::Custom(_) | Self::InvalidPattern { .. } => None,
        }
    }

    /// Returns the parameter name, if known.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Rejected { key, .. }
            | Self::Conversion { key, .. }
            | Self::Deserialization { key, .. } => Some(key),
            Self::Custom(_) | Self::InvalidPattern { .. } => None,
        }
    }

    /// Returns true if this error was built by a `throw_as` factory.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Borrows the custom error as its concrete type.
    ///
    /// Returns `None` for non-custom errors or when `E` is not the type the
    /// factory produced.
    #[must_use]
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Custom(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Rejected { rejection, .. } => match rejection {
                Rejection::Missing | Rejection::Empty => StatusCode::BAD_REQUEST,
                Rejection::InvalidSize | Rejection::InvalidValue => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            },
            Self::Conversion { .. } | Self::Deserialization { .. } => StatusCode::BAD_REQUEST,
            Self::Custom(_) | Self::InvalidPattern { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected { rejection, .. } => match rejection {
                Rejection::Missing => "MISSING_PARAMETER",
                Rejection::Empty => "EMPTY_PARAMETER",
                Rejection::InvalidSize => "INVALID_SIZE",
                Rejection::InvalidValue => "INVALID_VALUE",
            },
            Self::Custom(_) => "EXTRACTION_FAILED",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::Conversion { .. } => "CONVERSION_FAILED",
            Self::Deserialization { .. } => "DESERIALIZATION_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("bad input: {0}")]
    struct BadInput(String);

    fn rejected(rejection: Rejection) -> ParamError {
        ParamError::Rejected {
            location: ParamSource::Header,
            key: "x-token".to_string(),
            rejection,
        }
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(Rejection::Missing.to_string(), "missing");
        assert_eq!(Rejection::Empty.to_string(), "empty");
        assert_eq!(Rejection::InvalidSize.to_string(), "invalid-size");
        assert_eq!(Rejection::InvalidValue.to_string(), "invalid-value");
    }

    #[test]
    fn test_rejected_error_displays_bare_message() {
        let err = rejected(Rejection::InvalidValue);

        assert_eq!(err.to_string(), "invalid-value");
        assert_eq!(err.rejection(), Some(Rejection::InvalidValue));
        assert_eq!(err.location(), Some(ParamSource::Header));
        assert_eq!(err.key(), Some("x-token"));
        assert!(!err.is_custom());
    }

    #[test]
    fn test_rejected_status_codes() {
        assert_eq!(rejected(Rejection::Missing).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(rejected(Rejection::Empty).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            rejected(Rejection::InvalidSize).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            rejected(Rejection::InvalidValue).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_rejected_error_codes() {
        assert_eq!(rejected(Rejection::Missing).error_code(), "MISSING_PARAMETER");
        assert_eq!(rejected(Rejection::Empty).error_code(), "EMPTY_PARAMETER");
        assert_eq!(rejected(Rejection::InvalidSize).error_code(), "INVALID_SIZE");
        assert_eq!(rejected(Rejection::InvalidValue).error_code(), "INVALID_VALUE");
    }

    #[test]
    fn test_custom_error_downcast() {
        let err = ParamError::Custom(Box::new(BadInput("missing".to_string())));

        assert!(err.is_custom());
        assert_eq!(err.to_string(), "bad input: missing");
        assert_eq!(err.downcast_ref::<BadInput>().map(|e| e.0.as_str()), Some("missing"));
        assert!(err.downcast_ref::<std::fmt::Error>().is_none());
        assert_eq!(err.rejection(), None);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "EXTRACTION_FAILED");
    }

    #[test]
    fn test_conversion_error() {
        let err = ParamError::Conversion {
            location: ParamSource::Query,
            key: "age".to_string(),
            target: "i32",
            value: "twelve".to_string(),
        };

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "CONVERSION_FAILED");
        assert!(err.to_string().contains("age"));
        assert!(err.to_string().contains("i32"));
        assert!(err.to_string().contains("twelve"));
    }

    #[test]
    fn test_deserialization_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ParamError::Deserialization {
            location: ParamSource::Form,
            key: "payload".to_string(),
            source,
        };

        assert_eq!(err.location(), Some(ParamSource::Form));
        assert_eq!(err.error_code(), "DESERIALIZATION_FAILED");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_rejected_non_rejection_accessors() {
        let err = ParamError::Custom(Box::new(BadInput("empty".to_string())));
        assert_eq!(err.location(), None);
        assert_eq!(err.key(), None);
    }
}
