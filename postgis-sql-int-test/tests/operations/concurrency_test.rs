use postgis_sql::{AnsiDialect, Operation, Postgis, SqlValue, Value};
use std::thread;

#[test]
fn test_shared_handle_across_threads() {
    let st = Postgis::builder()
        .register(
            "utmzone",
            Operation::custom(|b, args| {
                let geom = b.classify(args.first().unwrap_or(&Value::Null))?;
                Ok(b.build_call("utmzone", vec![geom]))
            }),
        )
        .build()
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let st = st.clone();
            thread::spawn(move || {
                for j in 0..100 {
                    let column = format!("geom_{}", i);
                    let fragment = st
                        .as_text(st.buffer(column.as_str(), j).unwrap())
                        .unwrap()
                        .compile(&AnsiDialect);
                    assert_eq!(
                        fragment.sql,
                        format!(r#"ST_AsText(ST_Buffer("geom_{}", ?))"#, i)
                    );
                    assert_eq!(fragment.bindings, vec![SqlValue::Int(j)]);

                    let custom = st.call("utmzone", vec![column.into()]).unwrap();
                    assert_eq!(custom.sql(), "utmzone(??)");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
