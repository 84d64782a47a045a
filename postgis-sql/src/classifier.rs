//! Argument classification.
//!
//! Every value handed to an operation is classified exactly once, according
//! to the parameter it fills. Only a string matching the WKT grammar may end
//! up in SQL text; every other string is routed through identifier binding.

use crate::errors::{PostgisError, PostgisResult};
use crate::fragment::Fragment;
use crate::geojson::GeoJsonGeometry;
use crate::value::{Binding, SqlValue, Value};
use crate::wkt::WktLiteral;

/// A classified argument, ready for fragment assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A previously built fragment, spliced without re-validation.
    RawExpression(Fragment),
    /// A WKT/EWKT literal, embedded in the SQL text.
    Literal(WktLiteral),
    /// A column name, bound as an identifier.
    ColumnRef(String),
    /// A numeric value. Numeric strings keep their text form.
    Number(SqlValue),
    Boolean(bool),
    /// Canonical JSON text of a validated GeoJSON geometry.
    GeoJson(String),
    /// An optional parameter that was not supplied.
    Absent,
}

impl Argument {
    pub fn is_absent(&self) -> bool {
        matches!(self, Argument::Absent)
    }

    pub fn is_column_ref(&self) -> bool {
        matches!(self, Argument::ColumnRef(_))
    }

    pub fn column_name(&self) -> Option<&str> {
        match self {
            Argument::ColumnRef(name) => Some(name),
            _ => None,
        }
    }
}

/// Classifies a geometry argument.
///
/// Strings are WKT literals when they match the literal grammar and column
/// names otherwise. Scalars are bound as values. Structured values must be
/// GeoJSON geometries and are wrapped in `ST_GeomFromGeoJSON`, the only error
/// source of this function.
pub fn classify(value: &Value) -> PostgisResult<Argument> {
    let argument = match value {
        Value::Raw(fragment) => Argument::RawExpression(fragment.clone()),
        Value::Text(text) => match WktLiteral::parse(text) {
            Some(literal) => Argument::Literal(literal),
            None => Argument::ColumnRef(text.clone()),
        },
        Value::Int(n) => Argument::Number(SqlValue::Int(*n)),
        Value::Float(n) => Argument::Number(SqlValue::Float(*n)),
        Value::Bool(b) => Argument::Boolean(*b),
        Value::Json(_) => match classify_geojson(value)? {
            Argument::GeoJson(text) => Argument::RawExpression(Fragment::raw(
                "ST_GeomFromGeoJSON(?)",
                vec![Binding::value(text)],
            )),
            other => other,
        },
        Value::Null => Argument::Absent,
    };
    log::trace!("classified geometry argument {} as {:?}", value, argument);
    Ok(argument)
}

/// Classifies a numeric argument.
///
/// Numbers and numeric strings are bound as values; any other string names
/// a column that supplies the number at query time.
pub fn classify_number(value: &Value) -> PostgisResult<Argument> {
    let argument = match value {
        Value::Raw(fragment) => Argument::RawExpression(fragment.clone()),
        Value::Int(n) => Argument::Number(SqlValue::Int(*n)),
        Value::Float(n) if n.is_finite() => Argument::Number(SqlValue::Float(*n)),
        Value::Text(text) if is_numeric(text) => Argument::Number(SqlValue::Text(text.clone())),
        Value::Text(text) => Argument::ColumnRef(text.clone()),
        Value::Null => Argument::Absent,
        Value::Float(_) | Value::Bool(_) | Value::Json(_) => {
            return Err(PostgisError::invalid_number(value));
        }
    };
    log::trace!("classified numeric argument {} as {:?}", value, argument);
    Ok(argument)
}

/// Classifies a boolean argument. Strings name a boolean column.
pub fn classify_boolean(value: &Value) -> PostgisResult<Argument> {
    let argument = match value {
        Value::Raw(fragment) => Argument::RawExpression(fragment.clone()),
        Value::Bool(b) => Argument::Boolean(*b),
        Value::Text(text) => Argument::ColumnRef(text.clone()),
        Value::Null => Argument::Absent,
        Value::Int(_) | Value::Float(_) | Value::Json(_) => {
            return Err(PostgisError::invalid_boolean(value));
        }
    };
    log::trace!("classified boolean argument {} as {:?}", value, argument);
    Ok(argument)
}

/// Classifies a GeoJSON argument.
///
/// Objects and JSON text are validated and reduced to their geometry
/// members. A string without braces names a column holding GeoJSON text.
pub fn classify_geojson(value: &Value) -> PostgisResult<Argument> {
    let argument = match value {
        Value::Raw(fragment) => Argument::RawExpression(fragment.clone()),
        Value::Json(json) => {
            Argument::GeoJson(GeoJsonGeometry::from_json(json)?.to_canonical_json()?)
        }
        Value::Text(text) if !text.contains(['{', '}']) => Argument::ColumnRef(text.clone()),
        Value::Text(text) => Argument::GeoJson(GeoJsonGeometry::parse(text)?.to_canonical_json()?),
        Value::Null => Argument::Absent,
        Value::Int(_) | Value::Float(_) | Value::Bool(_) => {
            return Err(PostgisError::invalid_geojson(
                "",
                format!("expected a GeoJSON object, found {}", value.kind_name()),
            ));
        }
    };
    log::trace!("classified GeoJSON argument as {:?}", argument);
    Ok(argument)
}

fn is_numeric(text: &str) -> bool {
    text.trim().parse::<f64>().is_ok_and(f64::is_finite)
}
