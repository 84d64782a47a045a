//! Error types for fragment construction.
//!
//! Only two things can go wrong while building a fragment: an argument of the
//! wrong primitive shape, or GeoJSON input that does not describe a geometry.
//! Every other path is total (an unrecognized string is simply treated as a
//! column name).

use std::fmt::{self, Display};

use thiserror::Error;

/// One structural problem found while validating GeoJSON input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoJsonIssue {
    /// JSON-pointer style location of the offending member, `""` for the root.
    pub path: String,
    /// Human readable description.
    pub message: String,
}

impl GeoJsonIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl Display for GeoJsonIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Errors raised while classifying arguments or building fragments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PostgisError {
    /// A parameter received a value of the wrong primitive type, an operation
    /// was called with the wrong number of arguments, or an operation name is
    /// not registered.
    #[error("{0}")]
    InvalidArgument(String),

    /// GeoJSON input could not be parsed or does not describe a geometry.
    #[error("Invalid GeoJSON: {}", format_issues(.issues))]
    InvalidGeoJson { issues: Vec<GeoJsonIssue> },
}

impl PostgisError {
    /// Error for a parameter that expected a number.
    pub fn invalid_number(found: impl Display) -> Self {
        PostgisError::InvalidArgument(format!("Invalid number provided: {}", found))
    }

    /// Error for a parameter that expected a boolean.
    pub fn invalid_boolean(found: impl Display) -> Self {
        PostgisError::InvalidArgument(format!("Invalid boolean provided: {}", found))
    }

    /// Error carrying a single GeoJSON issue.
    pub fn invalid_geojson(path: impl Into<String>, message: impl Into<String>) -> Self {
        PostgisError::InvalidGeoJson {
            issues: vec![GeoJsonIssue::new(path, message)],
        }
    }

    /// Structural issues attached to an `InvalidGeoJson` error, empty otherwise.
    pub fn issues(&self) -> &[GeoJsonIssue] {
        match self {
            PostgisError::InvalidGeoJson { issues } => issues,
            PostgisError::InvalidArgument(_) => &[],
        }
    }
}

fn format_issues(issues: &[GeoJsonIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for fragment construction.
pub type PostgisResult<T> = Result<T, PostgisError>;
