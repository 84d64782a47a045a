//! GeoJSON geometry validation and normalization.
//!
//! Input is checked against the RFC 7946 geometry shapes and reduced to the
//! members PostGIS reads: `type`, `coordinates` (or `geometries` for a
//! collection) and an optional `crs`. Every other member is dropped. All
//! structural problems are collected so the caller sees the full list.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as Json;

use crate::errors::{GeoJsonIssue, PostgisError, PostgisResult};

/// The geometry `type` names accepted by `ST_GeomFromGeoJSON`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::LineString => "LineString",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryType {
    type Err = ();

    // Type names are case sensitive in GeoJSON.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Point" => Ok(GeometryType::Point),
            "MultiPoint" => Ok(GeometryType::MultiPoint),
            "LineString" => Ok(GeometryType::LineString),
            "MultiLineString" => Ok(GeometryType::MultiLineString),
            "Polygon" => Ok(GeometryType::Polygon),
            "MultiPolygon" => Ok(GeometryType::MultiPolygon),
            "GeometryCollection" => Ok(GeometryType::GeometryCollection),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum GeometryBody {
    Coordinates(Json),
    Geometries(Vec<GeoJsonGeometry>),
}

/// A validated GeoJSON geometry holding only the members PostGIS reads.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonGeometry {
    geometry_type: GeometryType,
    body: GeometryBody,
    crs: Option<Json>,
}

impl GeoJsonGeometry {
    /// Validates a parsed JSON value.
    pub fn from_json(json: &Json) -> PostgisResult<Self> {
        let mut issues = Vec::new();
        match check_geometry(json, "", &mut issues) {
            Some(geometry) if issues.is_empty() => Ok(geometry),
            _ => Err(PostgisError::InvalidGeoJson { issues }),
        }
    }

    /// Parses and validates GeoJSON text.
    pub fn parse(text: &str) -> PostgisResult<Self> {
        let json: Json = serde_json::from_str(text)
            .map_err(|e| PostgisError::invalid_geojson("", format!("malformed JSON: {}", e)))?;
        Self::from_json(&json)
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    /// The coordinate array, `None` for a geometry collection.
    pub fn coordinates(&self) -> Option<&Json> {
        match &self.body {
            GeometryBody::Coordinates(coords) => Some(coords),
            GeometryBody::Geometries(_) => None,
        }
    }

    /// Member geometries, `None` unless this is a geometry collection.
    pub fn geometries(&self) -> Option<&[GeoJsonGeometry]> {
        match &self.body {
            GeometryBody::Geometries(geometries) => Some(geometries),
            GeometryBody::Coordinates(_) => None,
        }
    }

    pub fn crs(&self) -> Option<&Json> {
        self.crs.as_ref()
    }

    /// Canonical JSON text: members in `type`, `coordinates`/`geometries`,
    /// `crs` order with no whitespace.
    pub fn to_canonical_json(&self) -> PostgisResult<String> {
        serde_json::to_string(self)
            .map_err(|e| PostgisError::invalid_geojson("", format!("not serializable: {}", e)))
    }
}

impl Serialize for GeoJsonGeometry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.crs.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", self.geometry_type.as_str())?;
        match &self.body {
            GeometryBody::Coordinates(coords) => map.serialize_entry("coordinates", coords)?,
            GeometryBody::Geometries(geometries) => {
                map.serialize_entry("geometries", geometries)?
            }
        }
        if let Some(crs) = &self.crs {
            map.serialize_entry("crs", crs)?;
        }
        map.end()
    }
}

fn check_geometry(json: &Json, path: &str, issues: &mut Vec<GeoJsonIssue>) -> Option<GeoJsonGeometry> {
    let Some(object) = json.as_object() else {
        issues.push(GeoJsonIssue::new(path, "expected a GeoJSON object"));
        return None;
    };

    let type_path = format!("{}/type", path);
    let geometry_type = match object.get("type") {
        None => {
            issues.push(GeoJsonIssue::new(path, "missing member \"type\""));
            return None;
        }
        Some(Json::String(name)) => match name.parse::<GeometryType>() {
            Ok(geometry_type) => geometry_type,
            Err(()) => {
                issues.push(GeoJsonIssue::new(
                    type_path,
                    format!("unsupported geometry type \"{}\"", name),
                ));
                return None;
            }
        },
        Some(_) => {
            issues.push(GeoJsonIssue::new(type_path, "expected a string"));
            return None;
        }
    };

    let crs = match object.get("crs") {
        None | Some(Json::Null) => None,
        Some(crs @ Json::Object(_)) => Some(crs.clone()),
        Some(_) => {
            issues.push(GeoJsonIssue::new(format!("{}/crs", path), "expected an object"));
            None
        }
    };

    if geometry_type == GeometryType::GeometryCollection {
        let geometries_path = format!("{}/geometries", path);
        let Some(members) = object.get("geometries") else {
            issues.push(GeoJsonIssue::new(path, "missing member \"geometries\""));
            return None;
        };
        let Some(members) = members.as_array() else {
            issues.push(GeoJsonIssue::new(geometries_path, "expected an array"));
            return None;
        };
        let geometries: Vec<GeoJsonGeometry> = members
            .iter()
            .enumerate()
            .filter_map(|(i, member)| {
                check_geometry(member, &format!("{}/{}", geometries_path, i), issues)
            })
            .collect();
        if geometries.len() != members.len() {
            return None;
        }
        return Some(GeoJsonGeometry {
            geometry_type,
            body: GeometryBody::Geometries(geometries),
            crs,
        });
    }

    let Some(coords) = object.get("coordinates") else {
        issues.push(GeoJsonIssue::new(path, "missing member \"coordinates\""));
        return None;
    };
    let coords_path = format!("{}/coordinates", path);
    let before = issues.len();
    match geometry_type {
        GeometryType::Point => check_position(coords, &coords_path, issues),
        GeometryType::MultiPoint => {
            check_array_of(coords, &coords_path, issues, check_position);
        }
        GeometryType::LineString => check_line(coords, &coords_path, issues),
        GeometryType::MultiLineString => {
            check_array_of(coords, &coords_path, issues, check_line);
        }
        GeometryType::Polygon => check_polygon(coords, &coords_path, issues),
        GeometryType::MultiPolygon => {
            check_array_of(coords, &coords_path, issues, check_polygon);
        }
        GeometryType::GeometryCollection => {}
    }
    if issues.len() != before {
        return None;
    }

    Some(GeoJsonGeometry {
        geometry_type,
        body: GeometryBody::Coordinates(coords.clone()),
        crs,
    })
}

fn check_array_of<F>(json: &Json, path: &str, issues: &mut Vec<GeoJsonIssue>, check: F) -> usize
where
    F: Fn(&Json, &str, &mut Vec<GeoJsonIssue>),
{
    let Some(items) = json.as_array() else {
        issues.push(GeoJsonIssue::new(path, "expected an array"));
        return 0;
    };
    for (i, item) in items.iter().enumerate() {
        check(item, &format!("{}/{}", path, i), issues);
    }
    items.len()
}

fn check_position(json: &Json, path: &str, issues: &mut Vec<GeoJsonIssue>) {
    let Some(values) = json.as_array() else {
        issues.push(GeoJsonIssue::new(path, "expected a position array"));
        return;
    };
    if !(2..=3).contains(&values.len()) {
        issues.push(GeoJsonIssue::new(
            path,
            format!("a position must have 2 or 3 elements, found {}", values.len()),
        ));
    }
    for (i, value) in values.iter().enumerate() {
        if !value.is_number() {
            issues.push(GeoJsonIssue::new(format!("{}/{}", path, i), "expected a number"));
        }
    }
}

fn check_line(json: &Json, path: &str, issues: &mut Vec<GeoJsonIssue>) {
    let count = check_array_of(json, path, issues, check_position);
    if json.is_array() && count < 2 {
        issues.push(GeoJsonIssue::new(path, "a line string needs at least 2 positions"));
    }
}

fn check_ring(json: &Json, path: &str, issues: &mut Vec<GeoJsonIssue>) {
    let before = issues.len();
    let count = check_array_of(json, path, issues, check_position);
    if issues.len() != before {
        return;
    }
    if count < 4 {
        issues.push(GeoJsonIssue::new(path, "a linear ring needs at least 4 positions"));
        return;
    }
    if let Some(ring) = json.as_array() {
        if !same_position(ring.first(), ring.last()) {
            issues.push(GeoJsonIssue::new(
                path,
                "the first and last positions of a linear ring must be equal",
            ));
        }
    }
}

// Numeric comparison, so `0` and `0.0` name the same coordinate.
fn same_position(a: Option<&Json>, b: Option<&Json>) -> bool {
    match (a.and_then(Json::as_array), b.and_then(Json::as_array)) {
        (Some(a), Some(b)) => {
            a.len() == b.len()
                && a.iter().zip(b).all(|(x, y)| match (x.as_f64(), y.as_f64()) {
                    (Some(x), Some(y)) => x == y,
                    _ => false,
                })
        }
        _ => false,
    }
}

fn check_polygon(json: &Json, path: &str, issues: &mut Vec<GeoJsonIssue>) {
    check_array_of(json, path, issues, check_ring);
}
