//! The operation registry and its typed entry points.

use std::fmt::{self, Debug};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::builder::FragmentBuilder;
use crate::catalog::{FunctionSpec, FUNCTION_CATALOG};
use crate::config::{PostgisConfig, WktMode};
use crate::errors::{PostgisError, PostgisResult};
use crate::fragment::Fragment;
use crate::value::Value;

type CustomFn = dyn Fn(&FragmentBuilder, &[Value]) -> PostgisResult<Fragment> + Send + Sync;
type ExtrasFn = Box<dyn FnOnce(&FragmentBuilder) -> Vec<(String, Operation)>>;

/// A named operation: a catalog entry or a caller-supplied function.
#[derive(Clone)]
pub enum Operation {
    Builtin(&'static FunctionSpec),
    Custom(Arc<CustomFn>),
}

impl Operation {
    /// Wraps a function that builds a fragment from raw arguments using the
    /// handle's [`FragmentBuilder`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&FragmentBuilder, &[Value]) -> PostgisResult<Fragment> + Send + Sync + 'static,
    {
        Operation::Custom(Arc::new(f))
    }

    pub fn invoke(&self, builder: &FragmentBuilder, args: &[Value]) -> PostgisResult<Fragment> {
        match self {
            Operation::Builtin(spec) => spec.apply(builder, args),
            Operation::Custom(f) => f(builder, args),
        }
    }
}

impl Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Builtin(spec) => write!(f, "Builtin({})", spec.name),
            Operation::Custom(_) => write!(f, "Custom"),
        }
    }
}

enum Registration {
    Single(String, Operation),
    Extras(ExtrasFn),
}

fn builtin_operations() -> IndexMap<String, Operation> {
    FUNCTION_CATALOG
        .iter()
        .map(|spec| (spec.name.to_string(), Operation::Builtin(spec)))
        .collect()
}

/// Builder for a [`Postgis`] handle.
///
/// Configuration errors are captured and returned from [`build`](Self::build),
/// so calls can be chained freely.
///
/// # Examples
///
/// ```rust
/// use postgis_sql::{Operation, Postgis, Value, WktMode};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let st = Postgis::builder()
///     .wkt_mode(WktMode::Bound)
///     .define_extras(|_| {
///         vec![(
///             "utmzone",
///             Operation::custom(|b, args| {
///                 let geom = b.classify(args.first().unwrap_or(&Value::Null))?;
///                 Ok(b.build_call("utmzone", vec![geom]))
///             }),
///         )]
///     })
///     .build()?;
///
/// let fragment = st.call("utmzone", vec!["geom".into()])?;
/// assert_eq!(fragment.sql(), "utmzone(??)");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PostgisBuilder {
    error: Option<PostgisError>,
    config: PostgisConfig,
    registrations: Vec<Registration>,
}

impl PostgisBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects how WKT literals reach the database.
    pub fn wkt_mode(mut self, mode: WktMode) -> Self {
        self.config.set_wkt_mode(mode);
        self
    }

    /// Enables or disables aliasing `as_text("geom")` style results back to
    /// the column name.
    pub fn auto_alias(mut self, enabled: bool) -> Self {
        self.config.set_auto_alias(enabled);
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: PostgisConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers one operation. A later registration under the same name
    /// replaces the earlier one, built-ins included.
    pub fn register(mut self, name: impl Into<String>, operation: Operation) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            self.capture(PostgisError::InvalidArgument(
                "operation name must not be empty".to_string(),
            ));
            return self;
        }
        self.registrations.push(Registration::Single(name, operation));
        self
    }

    /// Registers the operations returned by `extras`.
    ///
    /// `extras` runs once during [`build`](Self::build) and receives the
    /// fragment builder of the final configuration.
    pub fn define_extras<F, I, N>(mut self, extras: F) -> Self
    where
        F: FnOnce(&FragmentBuilder) -> I + 'static,
        I: IntoIterator<Item = (N, Operation)>,
        N: Into<String>,
    {
        self.registrations.push(Registration::Extras(Box::new(move |builder| {
            extras(builder)
                .into_iter()
                .map(|(name, op)| (name.into(), op))
                .collect()
        })));
        self
    }

    /// Builds the handle. Its operation set is fixed from here on.
    pub fn build(self) -> PostgisResult<Postgis> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let builder = FragmentBuilder::new(self.config);
        let mut operations = builtin_operations();

        for registration in self.registrations {
            let entries = match registration {
                Registration::Single(name, op) => vec![(name, op)],
                Registration::Extras(extras) => extras(&builder),
            };
            for (name, op) in entries {
                if name.trim().is_empty() {
                    return Err(PostgisError::InvalidArgument(
                        "operation name must not be empty".to_string(),
                    ));
                }
                if operations.contains_key(&name) {
                    log::warn!("operation `{}` is redefined", name);
                }
                log::debug!("registering operation `{}`", name);
                operations.insert(name, op);
            }
        }

        log::debug!("postgis handle ready with {} operations", operations.len());
        Ok(Postgis {
            inner: Arc::new(PostgisInner {
                builder,
                operations,
            }),
        })
    }

    fn capture(&mut self, error: PostgisError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

/// Spatial operations emitting SQL fragments.
///
/// The handle is immutable once built, cheap to clone and safe to share
/// between threads.
///
/// # Examples
///
/// ```rust
/// use postgis_sql::{AnsiDialect, Postgis};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let st = Postgis::new();
/// let wkt = st.as_text(st.centroid("geom")?)?.with_alias("centroid");
/// assert_eq!(
///     wkt.compile(&AnsiDialect).sql,
///     r#"ST_AsText(ST_Centroid("geom")) as "centroid""#
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Postgis {
    inner: Arc<PostgisInner>,
}

struct PostgisInner {
    builder: FragmentBuilder,
    operations: IndexMap<String, Operation>,
}

impl Default for Postgis {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Postgis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Postgis")
            .field("config", self.config())
            .field("operations", &self.inner.operations.len())
            .finish()
    }
}

impl Postgis {
    /// A handle with the default configuration and the built-in catalog.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PostgisInner {
                builder: FragmentBuilder::default(),
                operations: builtin_operations(),
            }),
        }
    }

    pub fn builder() -> PostgisBuilder {
        PostgisBuilder::new()
    }

    pub fn config(&self) -> &PostgisConfig {
        self.inner.builder.config()
    }

    pub fn fragment_builder(&self) -> &FragmentBuilder {
        &self.inner.builder
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.operations.contains_key(name)
    }

    /// Operation names in registration order, built-ins first.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.inner.operations.keys().map(String::as_str)
    }

    /// Invokes a registered operation by name. `Value::Null` marks an
    /// optional argument as not supplied.
    pub fn call(&self, name: &str, args: Vec<Value>) -> PostgisResult<Fragment> {
        let operation = self.inner.operations.get(name).ok_or_else(|| {
            PostgisError::InvalidArgument(format!("unknown operation `{}`", name))
        })?;
        operation.invoke(&self.inner.builder, &args)
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// `ST_X`: X coordinate of a point.
    pub fn x(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("x", vec![geom.into()])
    }

    /// `ST_Y`: Y coordinate of a point.
    pub fn y(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("y", vec![geom.into()])
    }

    /// `ST_Z`: Z coordinate of a point.
    pub fn z(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("z", vec![geom.into()])
    }

    /// `ST_M`: M coordinate of a point.
    pub fn m(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("m", vec![geom.into()])
    }

    /// `ST_Area`: area of a polygonal geometry.
    pub fn area(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("area", vec![geom.into()])
    }

    pub fn centroid(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("centroid", vec![geom.into()])
    }

    // ---------------------------------------------------------------------
    // Output
    // ---------------------------------------------------------------------

    /// `ST_AsText`. A bare column argument aliases the result to the column
    /// name, so `as_text("geom")` still selects a column named `geom`.
    pub fn as_text(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("as_text", vec![geom.into()])
    }

    /// `ST_AsEWKT`, aliased like [`as_text`](Self::as_text).
    pub fn as_ewkt(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("as_ewkt", vec![geom.into()])
    }

    /// `ST_AsGeoJSON`, aliased like [`as_text`](Self::as_text).
    pub fn as_geojson(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("as_geojson", vec![geom.into()])
    }

    // ---------------------------------------------------------------------
    // Relationships and measurements
    // ---------------------------------------------------------------------

    /// `a && b`: bounding boxes intersect.
    pub fn bounding_box_intersects(
        &self,
        geom1: impl Into<Value>,
        geom2: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call("bounding_box_intersects", vec![geom1.into(), geom2.into()])
    }

    /// `a @ b`: bounding box of `a` is contained by that of `b`.
    pub fn bounding_box_contained(
        &self,
        geom1: impl Into<Value>,
        geom2: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call("bounding_box_contained", vec![geom1.into(), geom2.into()])
    }

    /// `a ~ b`: bounding box of `a` contains that of `b`.
    pub fn bounding_box_contains(
        &self,
        geom1: impl Into<Value>,
        geom2: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call("bounding_box_contains", vec![geom1.into(), geom2.into()])
    }

    pub fn distance(&self, geom1: impl Into<Value>, geom2: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("distance", vec![geom1.into(), geom2.into()])
    }

    /// `ST_DistanceSphere`: distance in meters on a spherical earth.
    pub fn distance_sphere(
        &self,
        geom1: impl Into<Value>,
        geom2: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call("distance_sphere", vec![geom1.into(), geom2.into()])
    }

    /// `ST_DWithin(a, b, distance)`. The distance may be a number, a numeric
    /// string or a column name.
    pub fn dwithin(
        &self,
        geom1: impl Into<Value>,
        geom2: impl Into<Value>,
        distance: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call("dwithin", vec![geom1.into(), geom2.into(), distance.into()])
    }

    /// `ST_DWithin(a, b, distance, use_spheroid)`.
    pub fn dwithin_spheroid(
        &self,
        geom1: impl Into<Value>,
        geom2: impl Into<Value>,
        distance: impl Into<Value>,
        use_spheroid: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call(
            "dwithin",
            vec![geom1.into(), geom2.into(), distance.into(), use_spheroid.into()],
        )
    }

    pub fn intersection(
        &self,
        geom1: impl Into<Value>,
        geom2: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call("intersection", vec![geom1.into(), geom2.into()])
    }

    pub fn intersects(&self, geom1: impl Into<Value>, geom2: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("intersects", vec![geom1.into(), geom2.into()])
    }

    /// `ST_Within`: `geom1` lies completely inside `geom2`.
    pub fn within(&self, geom1: impl Into<Value>, geom2: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("within", vec![geom1.into(), geom2.into()])
    }

    // ---------------------------------------------------------------------
    // Processing
    // ---------------------------------------------------------------------

    /// `ST_Buffer`: geometry covering all points within `radius`.
    pub fn buffer(&self, geom: impl Into<Value>, radius: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("buffer", vec![geom.into(), radius.into()])
    }

    pub fn make_valid(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("make_valid", vec![geom.into()])
    }

    pub fn multi(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("multi", vec![geom.into()])
    }

    /// `ST_SetSRID`: stamps an SRID without transforming coordinates.
    pub fn set_srid(&self, geom: impl Into<Value>, srid: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("set_srid", vec![geom.into(), srid.into()])
    }

    /// `ST_Transform`: reprojects coordinates into `srid`.
    pub fn transform(&self, geom: impl Into<Value>, srid: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("transform", vec![geom.into(), srid.into()])
    }

    // ---------------------------------------------------------------------
    // Casts
    // ---------------------------------------------------------------------

    /// `geom::geography`.
    pub fn geography(&self, geom: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("geography", vec![geom.into()])
    }

    /// `geography::geometry`.
    pub fn geometry(&self, geography: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("geometry", vec![geography.into()])
    }

    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// `ST_GeographyFromText`. SRID 4326 is assumed by the database when the
    /// text carries no `SRID=n;` prefix.
    pub fn geography_from_text(&self, ewkt: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("geography_from_text", vec![ewkt.into()])
    }

    /// `ST_GeomFromText`. An `SRID=n;` prefix on a literal is moved into the
    /// SRID argument.
    pub fn geom_from_text(&self, wkt: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("geom_from_text", vec![wkt.into()])
    }

    /// `ST_GeomFromText(wkt, srid)`. The explicit SRID wins over a prefix.
    pub fn geom_from_text_with_srid(
        &self,
        wkt: impl Into<Value>,
        srid: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call("geom_from_text", vec![wkt.into(), srid.into()])
    }

    /// `ST_GeomFromGeoJSON`.
    ///
    /// Accepts a GeoJSON object, GeoJSON text, or the name of a column holding
    /// GeoJSON text. Objects and text are validated and reduced to their
    /// geometry members before binding.
    ///
    /// # Errors
    ///
    /// Returns [`PostgisError::InvalidGeoJson`] when the input is not a
    /// GeoJSON geometry.
    pub fn geom_from_geojson(&self, geojson: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("geom_from_geojson", vec![geojson.into()])
    }

    /// `ST_MakeEnvelope(xmin, ymin, xmax, ymax)`.
    pub fn make_envelope(
        &self,
        xmin: impl Into<Value>,
        ymin: impl Into<Value>,
        xmax: impl Into<Value>,
        ymax: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call(
            "make_envelope",
            vec![xmin.into(), ymin.into(), xmax.into(), ymax.into()],
        )
    }

    /// `ST_MakeEnvelope(xmin, ymin, xmax, ymax, srid)`.
    pub fn make_envelope_with_srid(
        &self,
        xmin: impl Into<Value>,
        ymin: impl Into<Value>,
        xmax: impl Into<Value>,
        ymax: impl Into<Value>,
        srid: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call(
            "make_envelope",
            vec![xmin.into(), ymin.into(), xmax.into(), ymax.into(), srid.into()],
        )
    }

    /// `ST_MakePoint(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`PostgisError::InvalidArgument`] when a coordinate is neither
    /// a number, a numeric string, a column name nor a fragment.
    pub fn make_point(&self, x: impl Into<Value>, y: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("make_point", vec![x.into(), y.into()])
    }

    /// `ST_MakePoint(x, y, z)`.
    pub fn make_point_z(
        &self,
        x: impl Into<Value>,
        y: impl Into<Value>,
        z: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call("make_point", vec![x.into(), y.into(), z.into()])
    }

    /// `ST_MakePoint(x, y, z, m)`.
    pub fn make_point_zm(
        &self,
        x: impl Into<Value>,
        y: impl Into<Value>,
        z: impl Into<Value>,
        m: impl Into<Value>,
    ) -> PostgisResult<Fragment> {
        self.call("make_point", vec![x.into(), y.into(), z.into(), m.into()])
    }

    /// `ST_Point(x, y)`.
    pub fn point(&self, x: impl Into<Value>, y: impl Into<Value>) -> PostgisResult<Fragment> {
        self.call("point", vec![x.into(), y.into()])
    }
}
