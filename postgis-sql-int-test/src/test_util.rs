use postgis_sql::{
    AnsiDialect, CompiledSql, Fragment, Postgis, PostgisResult, PostgresDialect, SqlDialect,
    SqlValue, WktMode,
};
use std::sync::Arc;
use std::time::Instant;

/// Runs a test between a setup and a teardown step.
/// The teardown step runs even when the test body returns an error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> PostgisResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> PostgisResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> PostgisResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| match before() {
        Ok(ctx) => match test(ctx.clone()) {
            Ok(_) => after(ctx).map_err(|e| format!("After run failed: {:?}", e)),
            Err(e) => {
                let _ = after(ctx);
                Err(format!("Test failed: {:?}", e))
            }
        },
        Err(e) => Err(format!("Before run failed: {:?}", e)),
    });

    let elapsed = start_time.elapsed();

    let error = match result {
        Ok(Ok(_)) => return,
        Ok(Err(e)) => e,
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", panic_err.type_id())
            };
            format!("Panic: {}", err_msg)
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {:?}", elapsed);
    eprintln!("Error: {}", error);
    eprintln!("=====================================================\n");

    panic!("Test failed. Last error: {}", error);
}

/// A handle plus the dialect its fragments are compiled for.
#[derive(Clone)]
pub struct TestContext {
    st: Postgis,
    dialect: Arc<dyn SqlDialect>,
}

impl TestContext {
    pub fn new(st: Postgis, dialect: Arc<dyn SqlDialect>) -> Self {
        Self { st, dialect }
    }

    pub fn st(&self) -> Postgis {
        self.st.clone()
    }

    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }

    pub fn compile(&self, fragment: &Fragment) -> CompiledSql {
        fragment.compile(self.dialect.as_ref())
    }
}

/// Default handle, compiled with `"ident"` quoting and `?` placeholders.
pub fn create_test_context() -> PostgisResult<TestContext> {
    Ok(TestContext::new(Postgis::new(), Arc::new(AnsiDialect)))
}

/// Handle that binds WKT literals instead of inlining them.
pub fn create_bound_test_context() -> PostgisResult<TestContext> {
    let st = Postgis::builder().wkt_mode(WktMode::Bound).build()?;
    Ok(TestContext::new(st, Arc::new(AnsiDialect)))
}

/// Default handle, compiled with numbered `$n` placeholders.
pub fn create_postgres_test_context() -> PostgisResult<TestContext> {
    Ok(TestContext::new(Postgis::new(), Arc::new(PostgresDialect)))
}

pub fn cleanup(ctx: TestContext) -> PostgisResult<()> {
    log::debug!(
        "finished test with {} registered operations",
        ctx.st().operation_names().count()
    );
    Ok(())
}

/// Compiles `fragment` in `ctx` and compares text and bound values.
pub fn assert_sql(ctx: &TestContext, fragment: &Fragment, sql: &str, bindings: Vec<SqlValue>) {
    let compiled = ctx.compile(fragment);
    assert_eq!(compiled.sql, sql);
    assert_eq!(compiled.bindings, bindings);
}

/// Asserts that `result` failed with a message starting with `prefix`.
pub fn assert_error_starts_with(result: PostgisResult<Fragment>, prefix: &str) {
    match result {
        Ok(fragment) => panic!("expected an error, got `{}`", fragment),
        Err(e) => assert!(
            e.to_string().starts_with(prefix),
            "expected `{}`, got `{}`",
            prefix,
            e
        ),
    }
}
