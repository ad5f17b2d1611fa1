//! Request context providing raw parameter values.
//!
//! [`RequestContext`] is the default [`ParamProvider`]: it owns the parts of
//! an HTTP request that parameters are read from.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};
use paralin_config::{ExtractConfig, DEFAULT_MAX_FORM_BODY_BYTES};
use std::borrow::Cow;

use crate::source::{form_value, header_value, urlencoded_value};
use crate::{ParamProvider, ParamSource};

/// Context providing access to the parameter-bearing parts of a request.
///
/// # Example
///
/// ```rust
/// use paralin::RequestContext;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let ctx = RequestContext::new(
///     Method::POST,
///     Uri::from_static("/login?next=%2Fhome"),
///     HeaderMap::new(),
///     Bytes::from_static(b"username=alice"),
/// );
///
/// assert_eq!(ctx.query_param("next").as_deref(), Some("/home"));
/// assert_eq!(ctx.form_param("username").as_deref(), Some("alice"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    max_form_body_bytes: usize,
}

impl RequestContext {
    /// Creates a new request context with the default form body limit.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            max_form_body_bytes: DEFAULT_MAX_FORM_BODY_BYTES,
        }
    }

    /// Creates a builder for a request context.
    #[must_use]
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::new()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the largest form body that will be decoded.
    #[must_use]
    pub fn max_form_body_bytes(&self) -> usize {
        self.max_form_body_bytes
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the first decoded value of a query parameter.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<String> {
        urlencoded_value(self.query_string()?, key)
    }

    /// Returns the first decoded value of a URL-encoded form field.
    ///
    /// Bodies over the form limit or that are not UTF-8 yield `None`.
    #[must_use]
    pub fn form_param(&self, key: &str) -> Option<String> {
        form_value(&self.body, key, self.max_form_body_bytes)
    }
}

impl ParamProvider for RequestContext {
    fn param(&self, source: ParamSource, key: &str) -> Option<Cow<'_, str>> {
        match source {
            ParamSource::Header => self.header(key).map(Cow::Borrowed),
            ParamSource::Query => self.query_param(key).map(Cow::Owned),
            ParamSource::Form => self.form_param(key).map(Cow::Owned),
        }
    }
}

/// Builder for constructing a [`RequestContext`].
///
/// Method and URI default to `GET /`.
#[derive(Debug)]
pub struct RequestContextBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    max_form_body_bytes: usize,
}

impl Default for RequestContextBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            uri: Uri::from_static("/"),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            max_form_body_bytes: DEFAULT_MAX_FORM_BODY_BYTES,
        }
    }
}

impl RequestContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = uri;
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends a single header. Invalid names or values are skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the largest form body that will be decoded.
    #[must_use]
    pub fn max_form_body_bytes(mut self, limit: usize) -> Self {
        self.max_form_body_bytes = limit;
        self
    }

    /// Applies the request-side settings of an [`ExtractConfig`].
    #[must_use]
    pub fn config(self, config: &ExtractConfig) -> Self {
        self.max_form_body_bytes(config.max_form_body_bytes)
    }

    /// Builds the request context.
    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            method: self.method,
            uri: self.uri,
            headers: self.headers,
            body: self.body,
            max_form_body_bytes: self.max_form_body_bytes,
        }
    }
}
