use postgis_sql::SqlValue;
use postgis_sql_int_test::test_util::{
    assert_error_starts_with, assert_sql, cleanup, create_bound_test_context, create_test_context,
    run_test,
};
use serde_json::json;

const POLYGON: &str = "Polygon((0 0, 0 1, 1 1, 1 0, 0 0))";

#[test]
fn test_intersects_columns() {
    run_test(
        create_test_context,
        |ctx| {
            let fragment = ctx.st().intersects("geom1", "geom2")?;
            assert_sql(&ctx, &fragment, r#"ST_Intersects("geom1", "geom2")"#, vec![]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_intersects_ewkt() {
    run_test(
        create_bound_test_context,
        |ctx| {
            let ewkt = "SRID=4326;Polygon((0 0, 0 1, 1 1, 1 0, 0 0))";
            let fragment = ctx.st().intersects("geom", ewkt)?;
            assert_sql(
                &ctx,
                &fragment,
                r#"ST_Intersects("geom", ?)"#,
                vec![SqlValue::Text(ewkt.to_string())],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_intersects_ewkt_inline() {
    run_test(
        create_test_context,
        |ctx| {
            let fragment = ctx
                .st()
                .intersects("geom", "SRID=4326;Polygon((0 0, 0 1, 1 1, 1 0, 0 0))")?;
            assert_sql(
                &ctx,
                &fragment,
                r#"ST_Intersects("geom", 'SRID=4326;Polygon((0 0, 0 1, 1 1, 1 0, 0 0))')"#,
                vec![],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_intersects_constructed_geometry() {
    run_test(
        create_bound_test_context,
        |ctx| {
            let st = ctx.st();
            let fragment = st.intersects("point", st.geom_from_text_with_srid(POLYGON, 4326)?)?;
            assert_sql(
                &ctx,
                &fragment,
                r#"ST_Intersects("point", ST_GeomFromText(?, ?))"#,
                vec![SqlValue::Text(POLYGON.to_string()), SqlValue::Int(4326)],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_intersects_geojson_object() {
    run_test(
        create_test_context,
        |ctx| {
            let fragment = ctx
                .st()
                .intersects("geom", json!({"type": "Point", "coordinates": [1, 2]}))?;
            assert_sql(
                &ctx,
                &fragment,
                r#"ST_Intersects("geom", ST_GeomFromGeoJSON(?))"#,
                vec![SqlValue::Text(
                    r#"{"type":"Point","coordinates":[1,2]}"#.to_string(),
                )],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_intersection() {
    run_test(
        create_test_context,
        |ctx| {
            let fragment = ctx.st().intersection("a", "b")?;
            assert_sql(&ctx, &fragment, r#"ST_Intersection("a", "b")"#, vec![]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_within() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            assert_sql(&ctx, &st.within("a", "b")?, r#"ST_Within("a", "b")"#, vec![]);
            assert_sql(
                &ctx,
                &st.within("a", st.point(-48.23456, 20.12345)?)?,
                r#"ST_Within("a", ST_Point(?, ?))"#,
                vec![SqlValue::Float(-48.23456), SqlValue::Float(20.12345)],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_distance() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            assert_sql(&ctx, &st.distance("a", "b")?, r#"ST_Distance("a", "b")"#, vec![]);
            assert_sql(
                &ctx,
                &st.distance("a", st.point(-48.23456, 20.12345)?)?,
                r#"ST_Distance("a", ST_Point(?, ?))"#,
                vec![SqlValue::Float(-48.23456), SqlValue::Float(20.12345)],
            );
            assert_sql(
                &ctx,
                &st.distance_sphere("a", "b")?,
                r#"ST_DistanceSphere("a", "b")"#,
                vec![],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_dwithin() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            assert_sql(
                &ctx,
                &st.dwithin("a", "b", 12)?,
                r#"ST_DWithin("a", "b", ?)"#,
                vec![SqlValue::Int(12)],
            );
            assert_sql(
                &ctx,
                &st.dwithin("a", "b", "distanceColumn")?,
                r#"ST_DWithin("a", "b", "distanceColumn")"#,
                vec![],
            );
            assert_sql(
                &ctx,
                &st.dwithin("a", st.point(-48.23456, 20.12345)?, 12)?,
                r#"ST_DWithin("a", ST_Point(?, ?), ?)"#,
                vec![
                    SqlValue::Float(-48.23456),
                    SqlValue::Float(20.12345),
                    SqlValue::Int(12),
                ],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_dwithin_spheroid() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            assert_sql(
                &ctx,
                &st.dwithin_spheroid("a", "b", 12, true)?,
                r#"ST_DWithin("a", "b", ?, ?)"#,
                vec![SqlValue::Int(12), SqlValue::Bool(true)],
            );
            assert_sql(
                &ctx,
                &st.dwithin_spheroid("a", "b", json!(12), json!(true))?,
                r#"ST_DWithin("a", "b", ?, ?)"#,
                vec![SqlValue::Int(12), SqlValue::Bool(true)],
            );
            assert_error_starts_with(
                st.dwithin_spheroid("a", "b", 12, json!([])),
                "Invalid boolean provided",
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_bounding_box_operators() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            assert_sql(&ctx, &st.bounding_box_intersects("a", "b")?, r#""a" && "b""#, vec![]);
            assert_sql(&ctx, &st.bounding_box_contained("a", "b")?, r#""a" @ "b""#, vec![]);
            assert_sql(&ctx, &st.bounding_box_contains("a", "b")?, r#""a" ~ "b""#, vec![]);
            assert_sql(
                &ctx,
                &st.bounding_box_intersects("geom", st.make_envelope(0, 0, 1, 1)?)?,
                r#""geom" && ST_MakeEnvelope(?, ?, ?, ?)"#,
                vec![
                    SqlValue::Int(0),
                    SqlValue::Int(0),
                    SqlValue::Int(1),
                    SqlValue::Int(1),
                ],
            );
            Ok(())
        },
        cleanup,
    )
}
