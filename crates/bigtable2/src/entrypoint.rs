use std::error::Error;

// The entrypoint macro refers to both `ffi` and `Connection` unqualified.
use duckdb::{ffi, Connection};
use duckdb_loadable_macros::duckdb_entrypoint_c_api;

/// Called by DuckDB on `LOAD`.
#[duckdb_entrypoint_c_api(ext_name = "bigtable2")]
pub unsafe fn extension_entrypoint(conn: Connection) -> Result<(), Box<dyn Error>> {
    crate::load(&conn)?;
    Ok(())
}
