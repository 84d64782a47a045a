use postgis_sql::{MySqlDialect, SqlValue};
use postgis_sql_int_test::test_util::{
    assert_sql, cleanup, create_postgres_test_context, create_test_context, run_test,
};

#[test]
fn test_postgres_numbered_placeholders() {
    run_test(
        create_postgres_test_context,
        |ctx| {
            let st = ctx.st();
            let fragment = st.dwithin("a", st.point(-48.23456, 20.12345)?, 12)?;
            assert_sql(
                &ctx,
                &fragment,
                r#"ST_DWithin("a", ST_Point($1, $2), $3)"#,
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
fn test_postgres_alias_is_not_a_placeholder() {
    run_test(
        create_postgres_test_context,
        |ctx| {
            let fragment = ctx.st().as_text(ctx.st().buffer("geom", 5)?)?.with_alias("buffered");
            assert_sql(
                &ctx,
                &fragment,
                r#"ST_AsText(ST_Buffer("geom", $1)) as "buffered""#,
                vec![SqlValue::Int(5)],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_identifier_quoting() {
    run_test(
        create_test_context,
        |ctx| {
            let st = ctx.st();
            assert_sql(
                &ctx,
                &st.centroid("points.geom")?,
                r#"ST_Centroid("points"."geom")"#,
                vec![],
            );
            assert_sql(
                &ctx,
                &st.centroid(r#"we"ird"#)?,
                r#"ST_Centroid("we""ird")"#,
                vec![],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_mysql_backticks() {
    run_test(
        create_test_context,
        |ctx| {
            let compiled = ctx.st().buffer("geom", 10)?.compile(&MySqlDialect);
            assert_eq!(compiled.sql, "ST_Buffer(`geom`, ?)");
            assert_eq!(compiled.bindings, vec![SqlValue::Int(10)]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_compiled_sql_serializes() {
    run_test(
        create_postgres_test_context,
        |ctx| {
            let compiled = ctx.compile(&ctx.st().make_point(1.5, "2")?);
            let json = serde_json::to_value(&compiled).unwrap();
            assert_eq!(
                json,
                serde_json::json!({"sql": "ST_MakePoint($1, $2)", "bindings": [1.5, "2"]})
            );
            Ok(())
        },
        cleanup,
    )
}
