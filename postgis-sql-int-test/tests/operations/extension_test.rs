use postgis_sql::{
    AnsiDialect, Operation, Postgis, PostgisError, PostgisResult, SqlValue, Value, WktMode,
};
use postgis_sql_int_test::test_util::{assert_sql, cleanup, run_test, TestContext};
use std::sync::Arc;

fn create_extended_context() -> PostgisResult<TestContext> {
    let st = Postgis::builder()
        .wkt_mode(WktMode::Bound)
        .define_extras(|_| {
            vec![(
                "utmzone",
                Operation::custom(|b, args| {
                    let geom = b.classify(args.first().unwrap_or(&Value::Null))?;
                    Ok(b.build_call("utmzone", vec![geom]))
                }),
            )]
        })
        .build()?;
    Ok(TestContext::new(st, Arc::new(AnsiDialect)))
}

#[test]
fn test_extra_operation_with_column() {
    run_test(
        create_extended_context,
        |ctx| {
            let fragment = ctx.st().call("utmzone", vec!["point".into()])?.with_alias("utm");
            assert_sql(&ctx, &fragment, r#"utmzone("point") as "utm""#, vec![]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_extra_operation_without_arguments() {
    run_test(
        create_extended_context,
        |ctx| {
            let fragment = ctx.st().call("utmzone", vec![])?;
            assert_sql(&ctx, &fragment, "utmzone()", vec![]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_extra_operation_with_nested_fragment() {
    run_test(
        create_extended_context,
        |ctx| {
            let st = ctx.st();
            let geom = st.geom_from_text_with_srid("Point(0 0, 0 1)", 4326)?;
            let fragment = st.call("utmzone", vec![geom.into()])?.with_alias("utm");
            assert_sql(
                &ctx,
                &fragment,
                r#"utmzone(ST_GeomFromText(?, ?)) as "utm""#,
                vec![
                    SqlValue::Text("Point(0 0, 0 1)".to_string()),
                    SqlValue::Int(4326),
                ],
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_extras_keep_builtins() {
    run_test(
        create_extended_context,
        |ctx| {
            let st = ctx.st();
            assert!(st.contains("utmzone"));
            assert!(st.contains("as_text"));
            assert_eq!(st.operation_names().last(), Some("utmzone"));
            assert!(!Postgis::new().contains("utmzone"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_later_registration_wins() {
    let st = Postgis::builder()
        .register(
            "utmzone",
            Operation::custom(|b, _| Ok(b.build_call("first", vec![]))),
        )
        .define_extras(|_| {
            vec![(
                "utmzone",
                Operation::custom(|b, _| Ok(b.build_call("second", vec![]))),
            )]
        })
        .build()
        .unwrap();
    assert_eq!(st.call("utmzone", vec![]).unwrap().sql(), "second()");
}

#[test]
fn test_extra_operation_errors_propagate() {
    let st = Postgis::builder()
        .register(
            "needs_number",
            Operation::custom(|b, args| {
                let n = b.classify_number(args.first().unwrap_or(&Value::Null))?;
                Ok(b.build_call("f", vec![n]))
            }),
        )
        .build()
        .unwrap();
    let err = st.call("needs_number", vec![true.into()]).unwrap_err();
    assert_eq!(err, PostgisError::invalid_number(Value::Bool(true)));
}

#[test]
fn test_unknown_operation() {
    let err = Postgis::new().call("utmzone", vec![]).unwrap_err();
    assert!(matches!(err, PostgisError::InvalidArgument(_)));
}
