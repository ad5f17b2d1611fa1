//! The fluent parameter builder.
//!
//! Extraction happens in two phases. [`Paralin::with`] returns an
//! [`HttpSelector`], which is consumed by picking a source and key. The
//! resulting [`OptionsBuilder`] collects validation rules and is consumed in
//! turn by exactly one terminal conversion.

use paralin_config::ExtractConfig;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::rules::{Failure, Rules, Verifier};
use crate::{ParamError, ParamProvider, ParamSource, Rejection};

type ErrorFactory<'a> = Box<dyn Fn(&str) -> Box<dyn std::error::Error + Send + Sync> + 'a>;

/// Entry point for extracting a request parameter.
///
/// # Example
///
/// ```rust
/// use paralin::{Paralin, RequestContext};
/// use http::Uri;
///
/// let ctx = RequestContext::builder()
///     .uri(Uri::from_static("/search?q=+rust+&page=2"))
///     .header("x-api-key", "k-123456")
///     .build();
///
/// let q = Paralin::with(&ctx).query("q").range(1..64).as_string().unwrap();
/// let page = Paralin::with(&ctx).query("page").default("1").as_int().unwrap();
/// let key = Paralin::with(&ctx)
///     .header("x-api-key")
///     .matches(r"k-\d{6}")
///     .as_string()
///     .unwrap();
///
/// assert_eq!(q, "rust");
/// assert_eq!(page, 2);
/// assert_eq!(key, "k-123456");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Paralin;

impl Paralin {
    /// Starts an extraction with default settings.
    #[must_use]
    pub fn with<P: ParamProvider + ?Sized>(provider: &P) -> HttpSelector<'_, P> {
        HttpSelector {
            provider,
            config: Cow::Owned(ExtractConfig::default()),
        }
    }

    /// Starts an extraction with the given settings.
    #[must_use]
    pub fn with_config<'a, P: ParamProvider + ?Sized>(
        provider: &'a P,
        config: &'a ExtractConfig,
    ) -> HttpSelector<'a, P> {
        HttpSelector {
            provider,
            config: Cow::Borrowed(config),
        }
    }
}

/// First phase of an extraction: choose where the parameter lives.
pub struct HttpSelector<'a, P: ?Sized> {
    provider: &'a P,
    config: Cow<'a, ExtractConfig>,
}

impl<P: ?Sized> fmt::Debug for HttpSelector<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSelector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, P: ParamProvider + ?Sized> HttpSelector<'a, P> {
    /// Reads the parameter from an HTTP header.
    #[must_use]
    pub fn header(self, key: impl Into<String>) -> OptionsBuilder<'a, P> {
        self.source(ParamSource::Header, key)
    }

    /// Reads the parameter from the URL query string.
    #[must_use]
    pub fn query(self, key: impl Into<String>) -> OptionsBuilder<'a, P> {
        self.source(ParamSource::Query, key)
    }

    /// Reads the parameter from an `x-www-form-urlencoded` body.
    #[must_use]
    pub fn form(self, key: impl Into<String>) -> OptionsBuilder<'a, P> {
        self.source(ParamSource::Form, key)
    }

    /// Reads the parameter from the given source.
    #[must_use]
    pub fn source(self, source: ParamSource, key: impl Into<String>) -> OptionsBuilder<'a, P> {
        OptionsBuilder {
            provider: self.provider,
            config: self.config,
            source,
            key: key.into(),
            rules: Rules::default(),
            error_factory: None,
        }
    }
}

/// Second phase of an extraction: validation rules and conversion.
///
/// Every rule is optional and may be set once; setting it again replaces the
/// previous value. Rules always run in the same order regardless of the order
/// they were configured in.
///
/// Terminal methods without a suffix return [`ParamError`] on failure. The
/// `_opt` variants return `None` for every failure instead.
pub struct OptionsBuilder<'a, P: ?Sized> {
    provider: &'a P,
    config: Cow<'a, ExtractConfig>,
    source: ParamSource,
    key: String,
    rules: Rules<'a>,
    error_factory: Option<ErrorFactory<'a>>,
}

impl<P: ?Sized> fmt::Debug for OptionsBuilder<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsBuilder")
            .field("source", &self.source)
            .field("key", &self.key)
            .field("rules", &self.rules)
            .field("custom_error", &self.error_factory.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a, P: ParamProvider + ?Sized> OptionsBuilder<'a, P> {
    /// Requires the value to match `pattern` in full.
    ///
    /// The pattern is anchored at both ends, so `[a-z]{3}` accepts `"abc"`
    /// but not `"abcd"`. It is compiled when the rule is reached; an invalid
    /// pattern yields [`ParamError::InvalidPattern`].
    #[must_use]
    pub fn matches(mut self, pattern: impl Into<String>) -> Self {
        self.rules.match_pattern = Some(pattern.into());
        self
    }

    /// Requires `predicate` to accept the value.
    #[must_use]
    pub fn verify<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + 'a,
    {
        let verifier: Verifier<'a> = Box::new(predicate);
        self.rules.verifier = Some(verifier);
        self
    }

    /// Uses `value` when the parameter is absent.
    ///
    /// A default is not substituted for a present but blank value.
    #[must_use]
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.rules.default_value = Some(value.into());
        self
    }

    /// Splits the value on the literal `delimiter` and keeps segment `index`.
    ///
    /// Skipped when the value equals the configured default. An index past
    /// the last segment is rejected as `invalid-value`.
    #[must_use]
    pub fn split(mut self, delimiter: impl Into<String>, index: usize) -> Self {
        self.rules.split = Some((delimiter.into(), index));
        self
    }

    /// Requires the value to be exactly `n` long.
    #[must_use]
    pub fn length(mut self, n: usize) -> Self {
        self.rules.exact_length = Some(n);
        self
    }

    /// Requires the value length to fall in `range` (start inclusive, end
    /// exclusive).
    #[must_use]
    pub fn range(mut self, range: Range<usize>) -> Self {
        self.rules.length_range = Some(range);
        self
    }

    /// Requires the value to contain `needle`.
    #[must_use]
    pub fn contains(mut self, needle: impl Into<String>) -> Self {
        self.rules.contains = Some(needle.into());
        self
    }

    /// Builds pipeline errors with `factory` instead of the default error.
    ///
    /// The factory receives the rejection message (`"missing"`, `"empty"`,
    /// `"invalid-size"` or `"invalid-value"`). The error is returned as
    /// [`ParamError::Custom`]; recover it with [`ParamError::downcast_ref`].
    ///
    /// ```rust
    /// use paralin::{Paralin, RequestContext};
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// #[error("bad request: {0}")]
    /// struct BadRequest(String);
    ///
    /// let ctx = RequestContext::builder().build();
    /// let err = Paralin::with(&ctx)
    ///     .header("authorization")
    ///     .throw_as(|msg| BadRequest(msg.to_string()))
    ///     .as_string()
    ///     .unwrap_err();
    ///
    /// assert_eq!(err.downcast_ref::<BadRequest>().unwrap().0, "missing");
    /// ```
    #[must_use]
    pub fn throw_as<E, F>(mut self, factory: F) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&str) -> E + 'a,
    {
        let boxed: ErrorFactory<'a> =
            Box::new(move |message: &str| -> Box<dyn std::error::Error + Send + Sync> {
                Box::new(factory(message))
            });
        self.error_factory = Some(boxed);
        self
    }

    /// Returns the validated string.
    pub fn as_string(self) -> Result<String, ParamError> {
        self.extract()
    }

    /// Returns the validated string, or `None` on any failure.
    pub fn as_string_opt(self) -> Option<String> {
        self.extract().ok()
    }

    /// Parses the validated string as an `i32`.
    pub fn as_int(self) -> Result<i32, ParamError> {
        self.parse()
    }

    /// Parses the validated string as an `i32`, or `None` on any failure.
    pub fn as_int_opt(self) -> Option<i32> {
        self.parse().ok()
    }

    /// Parses the validated string as an `f64`.
    pub fn as_double(self) -> Result<f64, ParamError> {
        self.parse()
    }

    /// Parses the validated string as an `f64`, or `None` on any failure.
    pub fn as_double_opt(self) -> Option<f64> {
        self.parse().ok()
    }

    /// Parses the validated string with [`FromStr`].
    pub fn parse<T: FromStr>(self) -> Result<T, ParamError> {
        let value = self.extract()?;
        value.parse().map_err(|_| self.conversion_failed::<T>(value))
    }

    /// Parses the validated string with [`FromStr`], or `None` on any failure.
    pub fn parse_opt<T: FromStr>(self) -> Option<T> {
        self.parse().ok()
    }

    /// Looks up the enum variant named after the uppercased value.
    ///
    /// Variant names come from the type's `Deserialize` impl, so plain Rust
    /// enums usually want `#[serde(rename_all = "UPPERCASE")]` or
    /// `"SCREAMING_SNAKE_CASE"`.
    ///
    /// ```rust
    /// use paralin::{Paralin, RequestContext};
    /// use http::Uri;
    /// use serde::Deserialize;
    ///
    /// #[derive(Debug, PartialEq, Deserialize)]
    /// #[serde(rename_all = "UPPERCASE")]
    /// enum Status {
    ///     Active,
    ///     Archived,
    /// }
    ///
    /// let ctx = RequestContext::builder()
    ///     .uri(Uri::from_static("/?status=active"))
    ///     .build();
    ///
    /// let status: Status = Paralin::with(&ctx).query("status").as_enum().unwrap();
    /// assert_eq!(status, Status::Active);
    /// ```
    pub fn as_enum<T: DeserializeOwned>(self) -> Result<T, ParamError> {
        let value = self.extract()?.to_uppercase();
        let deserializer: StrDeserializer<'_, ValueError> = value.as_str().into_deserializer();

        match T::deserialize(deserializer) {
            Ok(variant) => Ok(variant),
            Err(e) => {
                tracing::debug!(source = %self.source, key = %self.key, error = %e, "no matching enum variant");
                Err(self.conversion_failed::<T>(value))
            }
        }
    }

    /// Like [`as_enum`](Self::as_enum), returning `None` on any failure.
    pub fn as_enum_opt<T: DeserializeOwned>(self) -> Option<T> {
        self.as_enum().ok()
    }

    /// Deserializes the validated string as JSON.
    pub fn as_json<T: DeserializeOwned>(self) -> Result<T, ParamError> {
        let value = self.extract()?;

        serde_json::from_str(&value).map_err(|source| {
            tracing::debug!(source = %self.source, key = %self.key, error = %source, "parameter is not valid JSON");
            ParamError::Deserialization {
                location: self.source,
                key: self.key.clone(),
                source,
            }
        })
    }

    /// Like [`as_json`](Self::as_json), returning `None` on any failure.
    pub fn as_json_opt<T: DeserializeOwned>(self) -> Option<T> {
        self.as_json().ok()
    }

    fn extract(&self) -> Result<String, ParamError> {
        let raw = self.provider.param(self.source, &self.key);

        match self.rules.evaluate(raw, &self.config) {
            Ok(value) => {
                tracing::trace!(source = %self.source, key = %self.key, "parameter extracted");
                Ok(value)
            }
            Err(Failure::Rejected(rejection)) => {
                tracing::debug!(
                    source = %self.source,
                    key = %self.key,
                    rejection = rejection.message(),
                    "parameter rejected"
                );
                Err(self.reject(rejection))
            }
            Err(Failure::Pattern { pattern, source }) => {
                tracing::debug!(key = %self.key, pattern = %pattern, "match pattern does not compile");
                Err(ParamError::InvalidPattern { pattern, source })
            }
        }
    }

    fn reject(&self, rejection: Rejection) -> ParamError {
        match &self.error_factory {
            Some(factory) => ParamError::Custom(factory(rejection.message())),
            None => ParamError::Rejected {
                location: self.source,
                key: self.key.clone(),
                rejection,
            },
        }
    }

    fn conversion_failed<T>(&self, value: String) -> ParamError {
        tracing::debug!(source = %self.source, key = %self.key, target_type = type_name::<T>(), "conversion failed");
        ParamError::Conversion {
            location: self.source,
            key: self.key.clone(),
            target: type_name::<T>(),
            value,
        }
    }
}
