//! Built-in operation catalog.
//!
//! One entry per operation: the SQL it emits and the kind of each parameter.
//! Entries are applied by [`FunctionSpec::apply`], which checks arity,
//! classifies each argument by its parameter kind and assembles the fragment.

use crate::builder::FragmentBuilder;
use crate::classifier::Argument;
use crate::errors::{PostgisError, PostgisResult};
use crate::fragment::Fragment;
use crate::value::{SqlValue, Value};

/// How an operation is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlForm {
    /// `name(arg, ...)`.
    Call(&'static str),
    /// `left op right`.
    Operator(&'static str),
    /// `arg::type`.
    Cast(&'static str),
}

/// Kind of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Geometry,
    Number,
    Boolean,
    GeoJson,
    /// Geometry text whose `SRID=n;` prefix moves to the following SRID
    /// parameter when that parameter is not supplied.
    WktText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub optional: bool,
}

const fn required(name: &'static str, kind: ParamKind) -> Param {
    Param {
        name,
        kind,
        optional: false,
    }
}

const fn optional(name: &'static str, kind: ParamKind) -> Param {
    Param {
        name,
        kind,
        optional: true,
    }
}

const GEOM: Param = required("geom", ParamKind::Geometry);
const GEOM_PAIR: &[Param] = &[
    required("geom1", ParamKind::Geometry),
    required("geom2", ParamKind::Geometry),
];

/// A built-in spatial operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub form: SqlForm,
    pub params: &'static [Param],
    /// Alias the result with the column name when the only argument is a
    /// column reference.
    pub alias_column: bool,
}

impl FunctionSpec {
    const fn call(name: &'static str, sql: &'static str, params: &'static [Param]) -> Self {
        Self {
            name,
            form: SqlForm::Call(sql),
            params,
            alias_column: false,
        }
    }

    const fn aliased(name: &'static str, sql: &'static str) -> Self {
        Self {
            name,
            form: SqlForm::Call(sql),
            params: SINGLE_GEOM,
            alias_column: true,
        }
    }

    const fn operator(name: &'static str, op: &'static str) -> Self {
        Self {
            name,
            form: SqlForm::Operator(op),
            params: GEOM_PAIR,
            alias_column: false,
        }
    }

    const fn cast(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            form: SqlForm::Cast(type_name),
            params: SINGLE_GEOM,
            alias_column: false,
        }
    }

    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| !p.optional).count()
    }

    /// Classifies `args` against the parameter list and builds the fragment.
    pub fn apply(&self, builder: &FragmentBuilder, args: &[Value]) -> PostgisResult<Fragment> {
        if args.len() > self.params.len() || args.len() < self.required_count() {
            return Err(PostgisError::InvalidArgument(format!(
                "{} expects {} argument(s), got {}",
                self.name,
                self.arity_text(),
                args.len()
            )));
        }

        let mut classified = Vec::with_capacity(self.params.len());
        for (i, param) in self.params.iter().enumerate() {
            let value = args.get(i).unwrap_or(&Value::Null);
            let argument = match param.kind {
                ParamKind::Geometry | ParamKind::WktText => builder.classify(value)?,
                ParamKind::Number => builder.classify_number(value)?,
                ParamKind::Boolean => builder.classify_boolean(value)?,
                ParamKind::GeoJson => builder.classify_geojson(value)?,
            };
            if argument.is_absent() && !param.optional {
                return Err(match param.kind {
                    ParamKind::Number => PostgisError::invalid_number(value),
                    ParamKind::Boolean => PostgisError::invalid_boolean(value),
                    _ => PostgisError::InvalidArgument(format!(
                        "{} requires argument `{}`",
                        self.name, param.name
                    )),
                });
            }
            classified.push(argument);
        }

        self.move_srid_prefix(&mut classified);

        let fragment = match self.form {
            SqlForm::Call(sql) => builder.build_call(sql, classified.clone()),
            SqlForm::Operator(op) => {
                let mut iter = classified.iter().cloned();
                let left = iter.next().unwrap_or(Argument::Absent);
                let right = iter.next().unwrap_or(Argument::Absent);
                builder.build_operator(op, left, right)
            }
            SqlForm::Cast(type_name) => {
                let arg = classified.first().cloned().unwrap_or(Argument::Absent);
                builder.build_cast(arg, type_name)
            }
        };

        match classified.as_slice() {
            [single] if self.alias_column => Ok(builder.auto_alias(fragment, single)),
            _ => Ok(fragment),
        }
    }

    // An EWKT literal followed by an absent SRID parameter supplies the SRID
    // from its prefix; an explicit SRID wins and the prefix is dropped.
    fn move_srid_prefix(&self, classified: &mut [Argument]) {
        let Some(i) = self.params.iter().position(|p| p.kind == ParamKind::WktText) else {
            return;
        };
        if i + 1 >= classified.len() {
            return;
        }
        let Argument::Literal(literal) = classified[i].clone() else {
            return;
        };
        // A prefix that does not fit an integer stays in the literal.
        let Some(srid) = literal.srid_value() else {
            return;
        };
        if classified[i + 1].is_absent() {
            classified[i + 1] = Argument::Number(SqlValue::Int(srid));
        }
        classified[i] = Argument::Literal(literal.without_srid());
    }

    fn arity_text(&self) -> String {
        let required = self.required_count();
        if required == self.params.len() {
            required.to_string()
        } else {
            format!("{} to {}", required, self.params.len())
        }
    }
}

const SINGLE_GEOM: &[Param] = &[GEOM];
const BUFFER_PARAMS: &[Param] = &[GEOM, required("radius", ParamKind::Number)];
const SRID_PARAMS: &[Param] = &[GEOM, required("srid", ParamKind::Number)];
const DWITHIN_PARAMS: &[Param] = &[
    required("geom1", ParamKind::Geometry),
    required("geom2", ParamKind::Geometry),
    required("distance", ParamKind::Number),
    optional("use_spheroid", ParamKind::Boolean),
];
const EWKT_PARAMS: &[Param] = &[required("ewkt", ParamKind::Geometry)];
const GEOM_FROM_TEXT_PARAMS: &[Param] = &[
    required("wkt", ParamKind::WktText),
    optional("srid", ParamKind::Number),
];
const GEOJSON_PARAMS: &[Param] = &[required("geojson", ParamKind::GeoJson)];
const ENVELOPE_PARAMS: &[Param] = &[
    required("xmin", ParamKind::Number),
    required("ymin", ParamKind::Number),
    required("xmax", ParamKind::Number),
    required("ymax", ParamKind::Number),
    optional("srid", ParamKind::Number),
];
const MAKE_POINT_PARAMS: &[Param] = &[
    required("x", ParamKind::Number),
    required("y", ParamKind::Number),
    optional("z", ParamKind::Number),
    optional("m", ParamKind::Number),
];
const POINT_PARAMS: &[Param] = &[
    required("x", ParamKind::Number),
    required("y", ParamKind::Number),
];

/// Every built-in operation, keyed by its semantic name.
pub const FUNCTION_CATALOG: &[FunctionSpec] = &[
    FunctionSpec::call("x", "ST_X", SINGLE_GEOM),
    FunctionSpec::call("y", "ST_Y", SINGLE_GEOM),
    FunctionSpec::call("z", "ST_Z", SINGLE_GEOM),
    FunctionSpec::call("m", "ST_M", SINGLE_GEOM),
    FunctionSpec::call("area", "ST_Area", SINGLE_GEOM),
    FunctionSpec::aliased("as_text", "ST_AsText"),
    FunctionSpec::aliased("as_ewkt", "ST_AsEWKT"),
    FunctionSpec::aliased("as_geojson", "ST_AsGeoJSON"),
    FunctionSpec::operator("bounding_box_intersects", "&&"),
    FunctionSpec::operator("bounding_box_contained", "@"),
    FunctionSpec::operator("bounding_box_contains", "~"),
    FunctionSpec::call("buffer", "ST_Buffer", BUFFER_PARAMS),
    FunctionSpec::call("centroid", "ST_Centroid", SINGLE_GEOM),
    FunctionSpec::call("distance", "ST_Distance", GEOM_PAIR),
    FunctionSpec::call("distance_sphere", "ST_DistanceSphere", GEOM_PAIR),
    FunctionSpec::call("dwithin", "ST_DWithin", DWITHIN_PARAMS),
    FunctionSpec::call("intersection", "ST_Intersection", GEOM_PAIR),
    FunctionSpec::call("intersects", "ST_Intersects", GEOM_PAIR),
    FunctionSpec::cast("geography", "geography"),
    FunctionSpec::cast("geometry", "geometry"),
    FunctionSpec::call("geography_from_text", "ST_GeographyFromText", EWKT_PARAMS),
    FunctionSpec::call("geom_from_text", "ST_GeomFromText", GEOM_FROM_TEXT_PARAMS),
    FunctionSpec::call("geom_from_geojson", "ST_GeomFromGeoJSON", GEOJSON_PARAMS),
    FunctionSpec::call("make_envelope", "ST_MakeEnvelope", ENVELOPE_PARAMS),
    FunctionSpec::call("make_point", "ST_MakePoint", MAKE_POINT_PARAMS),
    FunctionSpec::call("make_valid", "ST_MakeValid", SINGLE_GEOM),
    FunctionSpec::call("multi", "ST_Multi", SINGLE_GEOM),
    FunctionSpec::call("point", "ST_Point", POINT_PARAMS),
    FunctionSpec::call("set_srid", "ST_SetSRID", SRID_PARAMS),
    FunctionSpec::call("transform", "ST_Transform", SRID_PARAMS),
    FunctionSpec::call("within", "ST_Within", GEOM_PAIR),
];

/// Looks up a built-in operation by semantic name.
pub fn find(name: &str) -> Option<&'static FunctionSpec> {
    FUNCTION_CATALOG.iter().find(|spec| spec.name == name)
}
