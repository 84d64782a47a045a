//! # PostGIS SQL - Spatial Fragments for Query Builders
//!
//! This crate builds PostGIS function calls as SQL fragments that a host
//! query builder can embed in `SELECT`, `WHERE` or `INSERT` clauses.
//!
//! ## Features
//!
//! - **Injection Safe**: Only strings matching the WKT grammar reach SQL text;
//!   every other string is bound as an identifier
//! - **Composable**: Fragments nest inside other operations with their bindings
//! - **Validated GeoJSON**: Objects and text are checked before binding
//! - **Extensible**: Custom operations register next to the built-in catalog
//! - **Dialect Aware**: Placeholders compile to `$n` or `?` with quoted identifiers
//! - **Thread Safe**: A built handle is immutable and shareable
//!
//! ## Quick Start
//!
//! ```rust
//! use postgis_sql::{Postgis, PostgresDialect, SqlValue};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let st = Postgis::new();
//!
//! // SELECT ST_AsText("geom") as "geom"
//! let column = st.as_text("geom")?;
//! assert_eq!(column.sql(), "ST_AsText(??) as ??");
//!
//! // WHERE ST_Intersects("geom", 'POLYGON((...))')
//! let filter = st.intersects("geom", "POLYGON((0 0,0 1,1 1,1 0,0 0))")?;
//! let compiled = filter.compile(&PostgresDialect);
//! assert_eq!(
//!     compiled.sql,
//!     r#"ST_Intersects("geom", 'POLYGON((0 0,0 1,1 1,1 0,0 0))')"#
//! );
//!
//! // INSERT ... VALUES (ST_MakePoint($1, $2))
//! let point = st.make_point(-48.23456, 20.12345)?.compile(&PostgresDialect);
//! assert_eq!(point.sql, "ST_MakePoint($1, $2)");
//! assert_eq!(point.bindings, vec![SqlValue::Float(-48.23456), SqlValue::Float(20.12345)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Operations
//!
//! ```rust
//! use postgis_sql::{Operation, Postgis, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let st = Postgis::builder()
//!     .register(
//!         "utmzone",
//!         Operation::custom(|b, args| {
//!             let geom = b.classify(args.first().unwrap_or(&Value::Null))?;
//!             Ok(b.build_call("utmzone", vec![geom]).with_alias("utm"))
//!         }),
//!     )
//!     .build()?;
//!
//! assert_eq!(st.call("utmzone", vec!["geom".into()])?.sql(), "utmzone(??) as ??");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod dialect;
pub mod errors;
pub mod fragment;
pub mod geojson;
pub mod postgis;
pub mod value;
pub mod wkt;

pub use builder::FragmentBuilder;
pub use catalog::{FunctionSpec, ParamKind, SqlForm, FUNCTION_CATALOG};
pub use classifier::Argument;
pub use config::{PostgisConfig, WktMode};
pub use dialect::{AnsiDialect, MySqlDialect, PostgresDialect, SqlDialect};
pub use errors::{GeoJsonIssue, PostgisError, PostgisResult};
pub use fragment::{CompiledSql, Fragment};
pub use geojson::{GeoJsonGeometry, GeometryType};
pub use postgis::{Operation, Postgis, PostgisBuilder};
pub use value::{Binding, SqlValue, Value};
pub use wkt::{is_wkt, WktLiteral};
