//! Parameter sources and the raw-value provider capability.
//!
//! The builder never touches a request directly. It asks a [`ParamProvider`]
//! for the raw string stored under a key in one of three [`ParamSource`]s.

use http::HeaderMap;
use paralin_config::DEFAULT_MAX_FORM_BODY_BYTES;
use std::borrow::Cow;
use std::fmt;

/// Where in the request a parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSource {
    /// HTTP headers
    Header,
    /// URL query string
    Query,
    /// URL-encoded form body
    Form,
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Query => write!(f, "query"),
            Self::Form => write!(f, "form"),
        }
    }
}

/// Capability to fetch a raw parameter value by source and key.
///
/// Implementations must be idempotent: reading the same key twice yields the
/// same answer. `None` means the parameter is absent.
///
/// # Implementing `ParamProvider`
///
/// ```rust
/// use paralin::{Paralin, ParamProvider, ParamSource};
/// use std::borrow::Cow;
/// use std::collections::HashMap;
///
/// struct Fixture(HashMap<&'static str, &'static str>);
///
/// impl ParamProvider for Fixture {
///     fn param(&self, source: ParamSource, key: &str) -> Option<Cow<'_, str>> {
///         match source {
///             ParamSource::Query => self.0.get(key).map(|v| Cow::Borrowed(*v)),
///             _ => None,
///         }
///     }
/// }
///
/// let fixture = Fixture(HashMap::from([("limit", "25")]));
/// assert_eq!(Paralin::with(&fixture).query("limit").as_int().unwrap(), 25);
/// ```
pub trait ParamProvider {
    /// Returns the raw value of `key` in `source`, if present.
    fn param(&self, source: ParamSource, key: &str) -> Option<Cow<'_, str>>;
}

/// Reads parameters straight from an [`http::Request`].
///
/// Form bodies are decoded up to the default size limit; use
/// [`RequestContext`](crate::RequestContext) to configure it.
impl<B: AsRef<[u8]>> ParamProvider for http::Request<B> {
    fn param(&self, source: ParamSource, key: &str) -> Option<Cow<'_, str>> {
        match source {
            ParamSource::Header => header_value(self.headers(), key).map(Cow::Borrowed),
            ParamSource::Query => urlencoded_value(self.uri().query()?, key).map(Cow::Owned),
            ParamSource::Form => {
                form_value(self.body().as_ref(), key, DEFAULT_MAX_FORM_BODY_BYTES).map(Cow::Owned)
            }
        }
    }
}

/// First value of a header, if it is visible ASCII.
pub(crate) fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// First value of `key` in a URL-encoded string.
pub(crate) fn urlencoded_value(input: &str, key: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(input) {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::debug!(error = %e, "undecodable url-encoded parameters");
            return None;
        }
    };

    pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// First value of `key` in a URL-encoded form body.
pub(crate) fn form_value(body: &[u8], key: &str, limit: usize) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    if body.len() > limit {
        tracing::warn!(
            size = body.len(),
            limit,
            "form body exceeds limit, treating parameters as absent"
        );
        return None;
    }

    match std::str::from_utf8(body) {
        Ok(body) => urlencoded_value(body, key),
        Err(e) => {
            tracing::warn!(error = %e, "form body is not valid UTF-8");
            None
        }
    }
}
