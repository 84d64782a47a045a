//! Caller-side input values and bound parameter values.

use std::fmt::{self, Display};

use serde::Serialize;

use crate::fragment::Fragment;

/// A value handed to a spatial operation before classification.
///
/// Each argument is classified exactly once into an
/// [`Argument`](crate::classifier::Argument) depending on the parameter it
/// fills.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A fragment built earlier, spliced in as-is.
    Raw(Fragment),
    /// A string: WKT literal, column name or GeoJSON text depending on context.
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Structured data, used for GeoJSON objects.
    Json(serde_json::Value),
    /// Explicitly absent; only valid for optional parameters.
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short description of the runtime shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Raw(_) => "raw expression",
            Value::Text(_) => "string",
            Value::Int(_) | Value::Float(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Json(serde_json::Value::Object(_)) => "object",
            Value::Json(serde_json::Value::Array(_)) => "array",
            Value::Json(_) => "json value",
            Value::Null => "null",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Raw(fragment) => write!(f, "{}", fragment.sql()),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Json(json) => write!(f, "{}", json),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<Fragment> for Value {
    fn from(fragment: Fragment) -> Self {
        Value::Raw(fragment)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        // JSON scalars take the shape of the matching native value.
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            other => Value::Json(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Int(n) => write!(f, "{}", n),
            SqlValue::Float(n) => write!(f, "{}", n),
            SqlValue::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            SqlValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Int(n)
    }
}

impl From<f64> for SqlValue {
    fn from(n: f64) -> Self {
        SqlValue::Float(n)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Bool(b)
    }
}

/// An entry in a fragment's binding list.
///
/// Values fill `?` placeholders; identifiers fill `??` placeholders and are
/// quoted by the dialect when the fragment is compiled.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Value(SqlValue),
    Identifier(String),
}

impl Binding {
    pub fn identifier(name: impl Into<String>) -> Self {
        Binding::Identifier(name.into())
    }

    pub fn value(value: impl Into<SqlValue>) -> Self {
        Binding::Value(value.into())
    }
}
