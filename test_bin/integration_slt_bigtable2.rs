use std::path::Path;

use bigtable2::extension::register_extension;
use bigtable2::functions::scalar::openssl_version::linked_openssl_version;
use bigtable2::Bigtable2Extension;
use bigtable2_error::{Result, ResultExt};
use bigtable2_slt::{ReplacementVars, RunConfig, VarValue};
use duckdb::Connection;

pub fn main() -> Result<()> {
    let paths = bigtable2_slt::find_files(Path::new("../slt/bigtable2"))?;

    let mut vars = ReplacementVars::default();
    vars.add_var(
        "OPENSSL_VERSION",
        VarValue::Plain(linked_openssl_version().to_string()),
    );

    bigtable2_slt::run(
        paths,
        || {
            let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
            register_extension(&conn, Bigtable2Extension)?;
            Ok(conn)
        },
        RunConfig { vars },
        "slt_bigtable2",
    )
}
