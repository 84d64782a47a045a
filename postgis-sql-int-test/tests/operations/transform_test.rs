use postgis_sql::SqlValue;
use postgis_sql_int_test::test_util::{assert_sql, cleanup, create_test_context, run_test};

#[test]
fn test_buffer() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            assert_sql(
                &ctx,
                &st.buffer("geom", 1000)?,
                r#"ST_Buffer("geom", ?)"#,
                vec![SqlValue::Int(1000)],
            );
            assert_sql(
                &ctx,
                &st.buffer("geom", "radius")?,
                r#"ST_Buffer("geom", "radius")"#,
                vec![],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_centroid() {
    run_test(
        create_test_context,
        |ctx| {
            let fragment = ctx.st().centroid("geom")?;
            assert_sql(&ctx, &fragment, r#"ST_Centroid("geom")"#, vec![]);
            assert_eq!(fragment.alias(), None);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_transform() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            assert_sql(
                &ctx,
                &st.transform("geom", 4326)?,
                r#"ST_Transform("geom", ?)"#,
                vec![SqlValue::Int(4326)],
            );
            assert_sql(
                &ctx,
                &st.transform("geom", "srid")?,
                r#"ST_Transform("geom", "srid")"#,
                vec![],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_set_srid_make_valid_multi() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            assert_sql(
                &ctx,
                &st.set_srid("geom", 4326)?,
                r#"ST_SetSRID("geom", ?)"#,
                vec![SqlValue::Int(4326)],
            );
            assert_sql(&ctx, &st.make_valid("geom")?, r#"ST_MakeValid("geom")"#, vec![]);
            assert_sql(&ctx, &st.multi("geom")?, r#"ST_Multi("geom")"#, vec![]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_geography_casts() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            assert_sql(&ctx, &st.geography("geom")?, r#""geom"::geography"#, vec![]);
            assert_sql(&ctx, &st.geometry("geog")?, r#""geog"::geometry"#, vec![]);
            assert_sql(
                &ctx,
                &st.distance(st.geography("a")?, st.geography("b")?)?,
                r#"ST_Distance("a"::geography, "b"::geography)"#,
                vec![],
            );
            assert_sql(
                &ctx,
                &st.geography(st.bounding_box_intersects("a", "b")?)?,
                r#"("a" && "b")::geography"#,
                vec![],
            );
            assert_sql(
                &ctx,
                &st.geography(st.centroid("geom")?)?,
                r#"ST_Centroid("geom")::geography"#,
                vec![],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nested_bindings_keep_order() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            let fragment = st.as_text(st.transform(st.buffer("geom", 10)?, 3857)?)?;
            assert_sql(
                &ctx,
                &fragment,
                r#"ST_AsText(ST_Transform(ST_Buffer("geom", ?), ?))"#,
                vec![SqlValue::Int(10), SqlValue::Int(3857)],
            );
            Ok(())
        },
        cleanup,
    )
}
