//! DuckDB extension registering the bigtable2 functions.
//!
//! ```sql
//! LOAD 'bigtable2.duckdb_extension';
//!
//! SELECT bigtable2('dog');                  -- Bigtable2 dog 🐥
//! SELECT bigtable2_openssl_version('dog');  -- Bigtable2 dog, my linked OpenSSL version is ...
//! SELECT * FROM bigtable2('anything');      -- 1, 2
//! SELECT * FROM bigtable2_hello('duck');    -- Hello duck
//! ```

pub mod config;
pub mod extension;
pub mod functions;

#[cfg(feature = "loadable-extension")]
mod entrypoint;

use std::ffi::CStr;

use bigtable2_error::Result;
use config::ExtensionConfig;
use duckdb::Connection;
use extension::{register_extension, Extension, ExtensionFunctions};
use functions::scalar::bigtable2::FUNCTION_SET_BIGTABLE2;
use functions::scalar::openssl_version::FUNCTION_SET_BIGTABLE2_OPENSSL_VERSION;
use functions::table::constant_rows::FUNCTION_SET_BIGTABLE2_SCAN;
use functions::table::hello::FUNCTION_SET_BIGTABLE2_HELLO;
use tracing::info;

pub const EXTENSION_NAME: &str = "bigtable2";

/// Version of the extension, set with `EXT_VERSION_BIGTABLE2` at build time.
pub const EXTENSION_VERSION: &str = match option_env!("EXT_VERSION_BIGTABLE2") {
    Some(version) => version,
    None => "",
};

#[derive(Debug, Clone, Copy)]
pub struct Bigtable2Extension;

impl Extension for Bigtable2Extension {
    const NAME: &'static str = EXTENSION_NAME;
    const VERSION: &'static str = EXTENSION_VERSION;

    const FUNCTIONS: Option<&'static ExtensionFunctions> = Some(&ExtensionFunctions {
        scalar: &[
            FUNCTION_SET_BIGTABLE2,
            FUNCTION_SET_BIGTABLE2_OPENSSL_VERSION,
        ],
        table: &[FUNCTION_SET_BIGTABLE2_SCAN, FUNCTION_SET_BIGTABLE2_HELLO],
    });
}

/// Version of the DuckDB library this extension is running in.
pub fn host_library_version() -> String {
    // SAFETY: DuckDB returns a pointer to a static, nul terminated string.
    let version = unsafe { CStr::from_ptr(duckdb::ffi::duckdb_library_version()) };
    version.to_string_lossy().into_owned()
}

/// Load the extension into the database behind `conn`.
///
/// Reads config from the environment, sets up logging if requested, then
/// registers all functions.
pub fn load(conn: &Connection) -> Result<()> {
    let config = ExtensionConfig::from_env()?;
    config.configure_logging();

    info!(
        extension = EXTENSION_NAME,
        version = EXTENSION_VERSION,
        host_version = %host_library_version(),
        "loading extension"
    );

    register_extension(conn, Bigtable2Extension)
}
