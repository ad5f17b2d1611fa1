//! # Paralin
//!
//! Fluent extraction and validation of HTTP request parameters.
//!
//! Pick a source and a key, chain the rules the value must satisfy, then
//! convert it:
//!
//! ```rust
//! use paralin::{Paralin, RequestContext};
//! use http::Uri;
//!
//! let ctx = RequestContext::builder()
//!     .uri(Uri::from_static("/orders?sort=created_at,desc&limit=20"))
//!     .build();
//!
//! let direction = Paralin::with(&ctx)
//!     .query("sort")
//!     .split(",", 1)
//!     .matches("asc|desc")
//!     .default("asc")
//!     .as_string()
//!     .unwrap();
//!
//! let limit = Paralin::with(&ctx)
//!     .query("limit")
//!     .range(1..4)
//!     .as_int()
//!     .unwrap();
//!
//! assert_eq!(direction, "desc");
//! assert_eq!(limit, 20);
//! ```
//!
//! ## Sources
//!
//! | Selector | Source |
//! |----------|--------|
//! | `header(key)` | First value of the header |
//! | `query(key)` | First decoded value in the query string |
//! | `form(key)` | First decoded value in an URL-encoded body |
//!
//! Any type implementing [`ParamProvider`] can stand in for a request;
//! [`RequestContext`] and [`http::Request`] are provided.
//!
//! ## Rules
//!
//! Rules run in a fixed order no matter how they were chained. The first
//! failure ends extraction:
//!
//! | Step | Rule | Rejection |
//! |------|------|-----------|
//! | 1 | value absent and no `default` | `missing` |
//! | 2 | value blank after trimming | `empty` |
//! | 3 | `split` index out of range | `invalid-value` |
//! | 4 | `length`, `range` | `invalid-size` |
//! | 5 | `contains`, `verify`, `matches` | `invalid-value` |
//!
//! ## Conversions
//!
//! `as_string`, `as_int`, `as_double`, `parse`, `as_enum` and `as_json`
//! return [`ParamError`] on failure. Each has an `_opt` twin that returns
//! `None` for every failure instead.
//!
//! ## Error Handling
//!
//! Pipeline failures become [`ParamError::Rejected`], whose message is the
//! bare rejection name. Register a factory with `throw_as` to get your own
//! error type instead:
//!
//! ```rust
//! use paralin::{Paralin, RequestContext};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("{0}")]
//! struct ApiError(String);
//!
//! let ctx = RequestContext::builder().build();
//! let err = Paralin::with(&ctx)
//!     .query("token")
//!     .throw_as(|msg| ApiError(msg.to_string()))
//!     .as_string()
//!     .unwrap_err();
//!
//! assert_eq!(err.downcast_ref::<ApiError>().unwrap().0, "missing");
//! ```

#![doc(html_root_url = "https://docs.rs/paralin/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod context;
mod error;
mod rules;
mod source;

pub use builder::{HttpSelector, OptionsBuilder, Paralin};
pub use context::{RequestContext, RequestContextBuilder};
pub use error::{ParamError, Rejection};
pub use source::{ParamProvider, ParamSource};

// Re-export settings so callers need a single dependency
pub use paralin_config::{ConfigLoader, ExtractConfig, LengthUnit};
