//! Recognition of WKT / EWKT geometry literals.
//!
//! A string is only ever spliced into SQL text when it matches this grammar
//! completely: an optional `SRID=<digits>;` prefix, a geometry keyword, an
//! optional dimension qualifier and a parenthesized body made of digits,
//! commas, whitespace, periods, parentheses and signs. Nothing may follow the
//! closing parenthesis. The body alphabet contains no quote characters, which
//! is what makes splicing safe.

use std::fmt::{self, Display};
use std::sync::LazyLock;

use regex::Regex;

static EWKT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let keywords = [
        "geometrycollection",
        "curvepolygon",
        "(?:multi)?(?:point|polygon|curve|surface|linestring)",
        "triangle",
        "circularstring",
        "compoundcurve",
        "polyhedralsurface",
        "tin",
    ]
    .join("|");
    let pattern = format!(
        r"(?i)^(?:srid=(?P<srid>[0-9]+);)?(?P<body>(?:{})(?:\s+(?:zm|z|m))?\s*\([0-9,\s.()+\-]*\))$",
        keywords
    );
    Regex::new(&pattern).expect("static WKT pattern is valid")
});

/// A string recognized as a WKT or EWKT geometry literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WktLiteral {
    srid: Option<String>,
    body: String,
}

impl WktLiteral {
    /// Parses `text` as an EWKT literal, returning `None` when it does not
    /// match the literal grammar exactly.
    pub fn parse(text: &str) -> Option<Self> {
        let captures = EWKT_PATTERN.captures(text)?;
        let body = captures.name("body")?.as_str().to_string();
        let srid = captures.name("srid").map(|m| m.as_str().to_string());
        Some(Self { srid, body })
    }

    /// The SRID digits of an `SRID=n;` prefix, if one was present.
    pub fn srid(&self) -> Option<&str> {
        self.srid.as_deref()
    }

    /// The SRID prefix as a number, when it fits in an `i64`.
    pub fn srid_value(&self) -> Option<i64> {
        self.srid.as_deref().and_then(|s| s.parse().ok())
    }

    /// The geometry text without any SRID prefix.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// A copy of this literal with the SRID prefix dropped.
    pub fn without_srid(&self) -> Self {
        Self {
            srid: None,
            body: self.body.clone(),
        }
    }

    /// The literal as SQL string-literal text, quotes included.
    pub fn to_sql_literal(&self) -> String {
        format!("'{}'", self)
    }
}

impl Display for WktLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.srid {
            Some(srid) => write!(f, "SRID={};{}", srid, self.body),
            None => write!(f, "{}", self.body),
        }
    }
}

/// Returns true if `text` is a WKT or EWKT geometry literal.
pub fn is_wkt(text: &str) -> bool {
    EWKT_PATTERN.is_match(text)
}
