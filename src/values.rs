//! Validated value objects shared by the resolution and search pipelines.
//!
//! Every type here is immutable once built. Constructors take raw input
//! straight from tool arguments and either hand back a value or a
//! [`ValidationError`] describing what was wrong with it.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9~._-]+$").expect("slug pattern is valid"));

/// Canonical identifier of one documentation set, e.g. `openjdk~21`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Validates a slug after trimming.
    ///
    /// # Arguments
    ///
    /// * `input` - raw slug such as `python~3.12`
    ///
    /// # Returns
    ///
    /// The slug, or a [`ValidationError`] when it is blank or holds characters
    /// outside letters, digits, `~`, `.`, `_` and `-`.
    pub fn create(input: &str) -> Result<Self, ValidationError> {
        let value = input.trim();
        if value.is_empty() {
            return Err(ValidationError::new("Slug must not be empty"));
        }
        if !SLUG_PATTERN.is_match(value) {
            return Err(ValidationError::new(format!(
                "Slug has invalid characters: {value}"
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text search term, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Trims the query. Blank input is rejected.
    pub fn create(input: &str) -> Result<Self, ValidationError> {
        let value = input.trim();
        if value.is_empty() {
            return Err(ValidationError::new("Query must not be empty"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounds applied when building a [`Limit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitBounds {
    pub min: usize,
    pub max: usize,
    pub fallback: usize,
}

impl Default for LimitBounds {
    fn default() -> Self {
        Self {
            min: 1,
            max: 50,
            fallback: 10,
        }
    }
}

/// Maximum number of results to return. Always inside its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Limit(usize);

impl Limit {
    /// Truncates toward zero and clamps. Non-finite input uses the fallback.
    pub fn create(input: f64, bounds: LimitBounds) -> Self {
        let value = if input.is_finite() {
            input.trunc()
        } else {
            bounds.fallback as f64
        };
        if value < bounds.min as f64 {
            Self(bounds.min)
        } else if value > bounds.max as f64 {
            Self(bounds.max)
        } else {
            Self(value as usize)
        }
    }

    /// Parses a decimal string, then behaves like [`Limit::create`].
    ///
    /// ```
    /// use devdocs_mcp::values::{Limit, LimitBounds};
    ///
    /// assert_eq!(Limit::parse("7.9", LimitBounds::default()).get(), 7);
    /// assert_eq!(Limit::parse("abc", LimitBounds::default()).get(), 10);
    /// assert_eq!(Limit::parse("500", LimitBounds::default()).get(), 50);
    /// ```
    pub fn parse(input: &str, bounds: LimitBounds) -> Self {
        let parsed = input.trim().parse::<f64>().unwrap_or(f64::NAN);
        Self::create(parsed, bounds)
    }

    /// Builds a limit from a tool argument.
    ///
    /// # Arguments
    ///
    /// * `input` - the raw JSON value, if the caller sent one
    /// * `bounds` - clamp range and fallback
    ///
    /// Numbers and numeric strings are honoured; anything else uses the fallback.
    pub fn from_json(input: Option<&Value>, bounds: LimitBounds) -> Self {
        match input {
            Some(Value::Number(n)) => Self::create(n.as_f64().unwrap_or(f64::NAN), bounds),
            Some(Value::String(s)) => Self::parse(s, bounds),
            _ => Self::create(f64::NAN, bounds),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::create(f64::NAN, LimitBounds::default())
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A language name or alias as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(String);

impl Language {
    /// Trims the name. Blank input is rejected.
    pub fn new(input: &str) -> Result<Self, ValidationError> {
        let value = input.trim();
        if value.is_empty() {
            return Err(ValidationError::new("Language value cannot be empty"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A version hint as typed by the user, e.g. `3.12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Trims the version. Blank input is rejected.
    pub fn new(input: &str) -> Result<Self, ValidationError> {
        let value = input.trim();
        if value.is_empty() {
            return Err(ValidationError::new("Version value cannot be empty"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `other` contains this hint, so `21` matches `21.0.1`.
    pub fn is_contained_in(&self, other: &str) -> bool {
        other.contains(self.0.as_str())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
