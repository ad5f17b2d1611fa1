//! The validation pipeline.
//!
//! [`Rules`] holds every option collected by the builder and runs them, in a
//! fixed order, against the raw value:
//!
//! 1. fall back to the default when the raw value is absent (`missing`)
//! 2. trim, then refuse an empty value (`empty`)
//! 3. split, unless the value is the default itself
//! 4. exact length, then length range (`invalid-size`)
//! 5. contains, verify, then full regex match (`invalid-value`)
//!
//! The first failing step ends the run.

use paralin_config::ExtractConfig;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use crate::Rejection;

/// Predicate registered with `verify`.
pub(crate) type Verifier<'a> = Box<dyn Fn(&str) -> bool + 'a>;

/// Why a pipeline run stopped.
#[derive(Debug)]
pub(crate) enum Failure {
    Rejected(Rejection),
    Pattern {
        pattern: String,
        source: regex::Error,
    },
}

impl From<Rejection> for Failure {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}

#[derive(Default)]
pub(crate) struct Rules<'a> {
    pub(crate) match_pattern: Option<String>,
    pub(crate) verifier: Option<Verifier<'a>>,
    pub(crate) default_value: Option<String>,
    pub(crate) split: Option<(String, usize)>,
    pub(crate) exact_length: Option<usize>,
    pub(crate) length_range: Option<Range<usize>>,
    pub(crate) contains: Option<String>,
}

impl fmt::Debug for Rules<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("match_pattern", &self.match_pattern)
            .field("verifier", &self.verifier.as_ref().map(|_| "Fn(&str) -> bool"))
            .field("default_value", &self.default_value)
            .field("split", &self.split)
            .field("exact_length", &self.exact_length)
            .field("length_range", &self.length_range)
            .field("contains", &self.contains)
            .finish()
    }
}

impl Rules<'_> {
    /// Runs the pipeline over `raw` and returns the validated value.
    pub(crate) fn evaluate(
        &self,
        raw: Option<Cow<'_, str>>,
        config: &ExtractConfig,
    ) -> Result<String, Failure> {
        let raw = raw
            .map(Cow::into_owned)
            .or_else(|| self.default_value.clone())
            .ok_or(Rejection::Missing)?;

        let mut value = if config.trim {
            raw.trim().to_string()
        } else {
            raw
        };

        if value.is_empty() {
            return Err(Rejection::Empty.into());
        }

        if let Some((delimiter, index)) = &self.split {
            if self.default_value.as_deref() != Some(value.as_str()) {
                value = value
                    .split(delimiter.as_str())
                    .nth(*index)
                    .map(str::to_string)
                    .ok_or(Rejection::InvalidValue)?;
            }
        }

        let unit = config.length_unit;

        if let Some(n) = self.exact_length {
            if unit.measure(&value) != n {
                return Err(Rejection::InvalidSize.into());
            }
        }

        if let Some(range) = &self.length_range {
            if !range.contains(&unit.measure(&value)) {
                return Err(Rejection::InvalidSize.into());
            }
        }

        if let Some(needle) = &self.contains {
            if !value.contains(needle.as_str()) {
                return Err(Rejection::InvalidValue.into());
            }
        }

        if let Some(verify) = &self.verifier {
            if !verify(&value) {
                return Err(Rejection::InvalidValue.into());
            }
        }

        if let Some(pattern) = &self.match_pattern {
            let regex = full_match(pattern).map_err(|source| Failure::Pattern {
                pattern: pattern.clone(),
                source,
            })?;

            if !regex.is_match(&value) {
                return Err(Rejection::InvalidValue.into());
            }
        }

        Ok(value)
    }
}

/// Compiles `pattern` so that it only matches the whole input.
fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}
