mod vars;

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bigtable2_error::{DbError, OptionExt, Result, ResultExt};
use duckdb::types::Value;
use duckdb::Connection;
use libtest_mimic::{Arguments, Trial};
use sqllogictest::{DBOutput, DefaultColumnType};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
pub use vars::*;

#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Variables to replace in the query.
    pub vars: ReplacementVars,
}

/// Run all SLTs from the provided paths.
///
/// This sets up tracing to log only at the ERROR level. RUST_LOG can be used to
/// print out logs at a lower level.
///
/// For each path, `conn_fn` will be called to create a fresh connection for
/// just that file.
///
/// `kind` should be used to group these SLTs together.
pub fn run<F>(
    paths: impl IntoIterator<Item = PathBuf>,
    conn_fn: F,
    conf: RunConfig,
    kind: &str,
) -> Result<()>
where
    F: Fn() -> Result<Connection> + Clone + Send + 'static,
{
    let args = Arguments::from_args();
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::ERROR.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_test_writer()
        .with_env_filter(env_filter)
        .with_file(true)
        .with_line_number(true)
        .finish();
    // Ignore the error, another harness in this process may have set it.
    let _ = tracing::subscriber::set_global_default(subscriber);

    let tests = paths
        .into_iter()
        .map(|path| {
            let test_name = path.to_string_lossy().to_string();
            let test_name = test_name.trim_start_matches("../").to_string();
            let conn_fn = conn_fn.clone();
            let conf = conf.clone();
            Trial::test(test_name, move || match run_test(&path, conn_fn, conf) {
                Ok(_) => Ok(()),
                Err(e) => Err(e.into()),
            })
            .with_kind(kind)
        })
        .collect();

    libtest_mimic::run(&args, tests).exit_if_failed();

    Ok(())
}

/// Recursively find all files with an `.slt` extension in the given directory.
///
/// Paths are sorted.
pub fn find_files(dir: &Path) -> Result<Vec<PathBuf>> {
    fn inner(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<()> {
        if dir.is_dir() {
            for entry in fs::read_dir(dir).context("read dir")? {
                let entry = entry.context("entry")?;
                let path = entry.path();
                if path.is_dir() {
                    inner(&path, paths)?;
                } else if path.extension().is_some_and(|ext| ext == "slt") {
                    paths.push(path);
                }
            }
        }
        Ok(())
    }

    let mut paths = Vec::new();
    inner(dir, &mut paths)?;
    paths.sort();

    Ok(paths)
}

/// Run an SLT at path, creating a connection from the provided function.
fn run_test(
    path: impl AsRef<Path>,
    conn_fn: impl Fn() -> Result<Connection>,
    conf: RunConfig,
) -> Result<()> {
    let path = path.as_ref();

    let mut runner = sqllogictest::Runner::new(move || {
        let session = conn_fn().map(|conn| TestSession {
            conf: conf.clone(),
            conn,
        });
        async move { session }
    });

    futures::executor::block_on(runner.run_file_async(path)).context("Failed to run SLT")?;

    Ok(())
}

struct TestSession {
    conf: RunConfig,
    conn: Connection,
}

impl TestSession {
    fn run_inner(&mut self, sql: &str) -> Result<DBOutput<DefaultColumnType>> {
        let sql = self.conf.vars.replace_in_query(sql);

        if !returns_rows(&sql) {
            self.conn
                .execute_batch(&sql)
                .context_fn(|| format!("Failed to execute statement: {sql}"))?;
            return Ok(DBOutput::StatementComplete(0));
        }

        let mut stmt = self
            .conn
            .prepare(&sql)
            .context_fn(|| format!("Failed to prepare query: {sql}"))?;
        let mut rows = stmt.query([]).context("Failed to execute query")?;
        let num_columns = rows.as_ref().required("statement for rows")?.column_count();

        let mut types = vec![DefaultColumnType::Any; num_columns];
        let mut out = Vec::new();

        while let Some(row) = rows.next().context("Failed to read row")? {
            let mut cols = Vec::with_capacity(num_columns);
            for idx in 0..num_columns {
                let value: Value = row.get(idx).context("Failed to get value")?;
                if let Some(typ) = column_type(&value) {
                    types[idx] = typ;
                }
                cols.push(format_value(value));
            }
            out.push(cols);
        }

        Ok(DBOutput::Rows { types, rows: out })
    }
}

#[async_trait]
impl sqllogictest::AsyncDB for TestSession {
    type Error = DbError;
    type ColumnType = DefaultColumnType;

    async fn run(&mut self, sql: &str) -> Result<DBOutput<Self::ColumnType>, Self::Error> {
        self.run_inner(sql)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

/// Check if a statement should be run as a query.
fn returns_rows(sql: &str) -> bool {
    const QUERY_KEYWORDS: &[&str] = &[
        "select", "from", "with", "values", "pragma", "describe", "show", "summarize", "explain",
        "table", "call",
    ];

    let first = sql
        .split_whitespace()
        .next()
        .map(|word| word.trim_start_matches('(').to_ascii_lowercase())
        .unwrap_or_default();

    QUERY_KEYWORDS.contains(&first.as_str())
}

fn column_type(value: &Value) -> Option<DefaultColumnType> {
    match value {
        Value::Null => None,
        Value::TinyInt(_)
        | Value::SmallInt(_)
        | Value::Int(_)
        | Value::BigInt(_)
        | Value::HugeInt(_)
        | Value::UTinyInt(_)
        | Value::USmallInt(_)
        | Value::UInt(_)
        | Value::UBigInt(_) => Some(DefaultColumnType::Integer),
        Value::Float(_) | Value::Double(_) | Value::Decimal(_) => {
            Some(DefaultColumnType::FloatingPoint)
        }
        _ => Some(DefaultColumnType::Text),
    }
}

/// Format a value the way SLT files expect it.
fn format_value(value: Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Boolean(v) => v.to_string(),
        Value::TinyInt(v) => v.to_string(),
        Value::SmallInt(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::BigInt(v) => v.to_string(),
        Value::HugeInt(v) => v.to_string(),
        Value::UTinyInt(v) => v.to_string(),
        Value::USmallInt(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::UBigInt(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Text(s) if s.is_empty() => "(empty)".to_string(),
        Value::Text(s) => s,
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_queries() {
        assert!(returns_rows("SELECT 1"));
        assert!(returns_rows("  from bigtable2('x')"));
        assert!(returns_rows("(SELECT 1) UNION (SELECT 2)"));
        assert!(!returns_rows("CREATE TABLE t (a INT)"));
        assert!(!returns_rows("INSERT INTO t VALUES (1)"));
        assert!(!returns_rows(""));
    }

    #[test]
    fn formats_values() {
        assert_eq!("NULL", format_value(Value::Null));
        assert_eq!("(empty)", format_value(Value::Text(String::new())));
        assert_eq!("Hello duck", format_value(Value::Text("Hello duck".to_string())));
        assert_eq!("2", format_value(Value::Int(2)));
        assert_eq!("true", format_value(Value::Boolean(true)));
    }

    #[test]
    fn column_types() {
        assert_eq!(None, column_type(&Value::Null));
        assert_eq!(Some(DefaultColumnType::Integer), column_type(&Value::Int(1)));
        assert_eq!(
            Some(DefaultColumnType::Text),
            column_type(&Value::Text("a".to_string()))
        );
    }

    #[test]
    fn find_files_skips_non_slt() {
        let dir = std::env::temp_dir().join(format!("bigtable2_slt_find_{}", std::process::id()));
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("b.slt"), "").unwrap();
        fs::write(dir.join("nested/a.slt"), "").unwrap();
        fs::write(dir.join("README.md"), "").unwrap();

        let files = find_files(&dir).unwrap();
        assert_eq!(vec![dir.join("b.slt"), dir.join("nested/a.slt")], files);

        fs::remove_dir_all(&dir).unwrap();
    }
}
