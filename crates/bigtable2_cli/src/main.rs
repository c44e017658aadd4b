use std::io::{self, Read, Write};
use std::path::PathBuf;

use bigtable2::extension::Extension;
use bigtable2::{Bigtable2Extension, EXTENSION_NAME, EXTENSION_VERSION};
use bigtable2_error::{Result, ResultExt};
use clap::Parser;
use duckdb::arrow::record_batch::RecordBatch;
use duckdb::arrow::util::pretty::pretty_format_batches;
use duckdb::Connection;
use logutil::LogFormat;
use tracing::debug;

#[derive(Parser)]
#[clap(name = "bigtable2", version)]
struct Arguments {
    /// Execute file containing sql statements then exit.
    #[clap(short = 'f', long)]
    files: Vec<PathBuf>,
    /// Print the functions provided by the extension then exit.
    #[clap(long)]
    list_functions: bool,
    /// Format for log output written to stderr.
    #[clap(long, env = "BIGTABLE2_LOG_FORMAT", default_value = "human")]
    log_format: LogFormat,
    /// Queries to execute.
    ///
    /// If omitted, and no files were given via the `files` argument, sql is
    /// read from stdin.
    #[clap(trailing_var_arg = true)]
    queries: Vec<String>,
}

/// Simple binary for running queries against an in-memory DuckDB database
/// with the extension loaded.
fn main() {
    let args = Arguments::parse();
    logutil::configure_global_logger(tracing::Level::ERROR, args.log_format, io::stderr);

    // Nested result. Outer result for the panic, inner is execution result.
    let result = std::panic::catch_unwind(|| inner(args));

    match result {
        Ok(Err(err)) => {
            // "Normal" error.
            println!("ERROR: {err}");
            std::process::exit(1);
        }
        Err(err) => {
            // Panic error.
            println!("PANIC: {err:?}");
            std::process::exit(2);
        }
        Ok(Ok(())) => (),
    }
}

fn inner(args: Arguments) -> Result<()> {
    let mut stdout = io::stdout().lock();

    if args.list_functions {
        return list_functions(&mut stdout);
    }

    let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
    bigtable2::load(&conn)?;

    let mut sources = Vec::new();
    for path in &args.files {
        sources.push(
            std::fs::read_to_string(path)
                .context_fn(|| format!("Failed to read file: {}", path.display()))?,
        );
    }
    sources.extend(args.queries);

    if sources.is_empty() {
        let mut sql = String::new();
        io::stdin()
            .read_to_string(&mut sql)
            .context("Failed to read stdin")?;
        sources.push(sql);
    }

    for source in &sources {
        for statement in split_statements(source) {
            run_statement(&conn, statement, &mut stdout)?;
        }
    }

    Ok(())
}

fn run_statement(conn: &Connection, sql: &str, out: &mut impl Write) -> Result<()> {
    debug!(%sql, "running statement");

    let mut stmt = conn
        .prepare(sql)
        .context_fn(|| format!("Failed to prepare: {sql}"))?;
    let batches: Vec<RecordBatch> = stmt.query_arrow([]).context("Failed to execute")?.collect();

    if batches.iter().all(|batch| batch.num_columns() == 0) {
        return Ok(());
    }

    let table = pretty_format_batches(&batches).context("Failed to format results")?;
    writeln!(out, "{table}")?;

    Ok(())
}

fn list_functions(out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "{EXTENSION_NAME} {EXTENSION_VERSION} (DuckDB {})",
        bigtable2::host_library_version()
    )?;

    let Some(functions) = Bigtable2Extension::FUNCTIONS else {
        return Ok(());
    };

    for scalar in functions.scalar {
        writeln!(out)?;
        writeln!(
            out,
            "{}{} [scalar, {}]",
            scalar.name,
            scalar.function.signature(),
            scalar.doc.category.as_str()
        )?;
        write_doc_body(out, scalar.aliases, scalar.doc)?;
    }

    for table in functions.table {
        writeln!(out)?;
        writeln!(
            out,
            "{}{} [table, {}]",
            table.name,
            table.function.signature(),
            table.doc.category.as_str()
        )?;
        write_doc_body(out, table.aliases, table.doc)?;
    }

    Ok(())
}

fn write_doc_body(
    out: &mut impl Write,
    aliases: &[&str],
    doc: &bigtable2::functions::documentation::Documentation,
) -> Result<()> {
    writeln!(out, "  {}", doc.description.trim())?;
    if !aliases.is_empty() {
        writeln!(out, "  aliases: {}", aliases.join(", "))?;
    }
    if let Some(example) = doc.example {
        writeln!(out, "  example: {} => {}", example.example, example.output)?;
    }
    Ok(())
}

/// Split sql text into individual statements on semicolons that aren't inside
/// string literals or quoted identifiers.
///
/// Empty statements are skipped.
fn split_statements(sql: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, c) in sql.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => (),
            (None, '\'' | '"') => quote = Some(c),
            (None, ';') => {
                statements.push(&sql[start..idx]);
                start = idx + 1;
            }
            (None, _) => (),
        }
    }
    statements.push(&sql[start..]);

    statements
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Arguments::command().debug_assert();
    }

    #[test]
    fn split_simple() {
        assert_eq!(
            vec!["SELECT 1", "SELECT bigtable2('dog')"],
            split_statements("SELECT 1; SELECT bigtable2('dog');\n")
        );
    }

    #[test]
    fn split_ignores_quoted_semicolons() {
        assert_eq!(
            vec!["SELECT 'a;b'", "SELECT \"x;y\" FROM t"],
            split_statements("SELECT 'a;b'; SELECT \"x;y\" FROM t")
        );
    }

    #[test]
    fn split_skips_empty() {
        assert!(split_statements(" ;; \n ").is_empty());
    }

    #[test]
    fn runs_statements_and_prints_tables() {
        let conn = Connection::open_in_memory().unwrap();
        bigtable2::load(&conn).unwrap();

        let mut out = Vec::new();
        run_statement(&conn, "SELECT bigtable2('dog') AS greeting", &mut out).unwrap();
        run_statement(&conn, "SELECT * FROM bigtable2('x')", &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("greeting"));
        assert!(out.contains("Bigtable2 dog 🐥"));
        assert!(out.contains("col1"));
    }

    #[test]
    fn lists_functions() {
        let mut out = Vec::new();
        list_functions(&mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("bigtable2(VARCHAR) -> VARCHAR [scalar, string]"));
        assert!(out.contains("bigtable2(VARCHAR) -> TABLE [table, table]"));
        assert!(out.contains("bigtable2_openssl_version(VARCHAR) -> VARCHAR"));
        assert!(out.contains("aliases: hello"));
        assert!(out.contains("example: bigtable2('dog') => Bigtable2 dog 🐥"));
    }
}
