use bigtable2_error::{DbError, Result};
use duckdb::Connection;
use tracing::{debug, info};

use crate::functions::function_set::{ScalarFunctionSet, TableFunctionSet};

pub trait Extension {
    /// The name of the extension.
    const NAME: &'static str;

    /// Version reported to the host. May be empty.
    const VERSION: &'static str;

    /// Functions provided by this extension.
    const FUNCTIONS: Option<&'static ExtensionFunctions>;
}

#[derive(Debug, Clone, Copy)]
pub struct ExtensionFunctions {
    pub scalar: &'static [ScalarFunctionSet],
    pub table: &'static [TableFunctionSet],
}

impl ExtensionFunctions {
    /// Iterate over every name that will be registered, aliases included.
    pub fn registered_names(&self) -> impl Iterator<Item = &'static str> {
        let scalar = self
            .scalar
            .iter()
            .flat_map(|f| std::iter::once(f.name).chain(f.aliases.iter().copied()));
        let table = self
            .table
            .iter()
            .flat_map(|f| std::iter::once(f.name).chain(f.aliases.iter().copied()));
        scalar.chain(table)
    }
}

/// Register all functions of an extension with the database behind `conn`.
///
/// Functions are registered under their name and every alias. Registration
/// stops at the first function the host rejects.
pub fn register_extension<E>(conn: &Connection, _ext: E) -> Result<()>
where
    E: Extension,
{
    let functions = match E::FUNCTIONS {
        Some(functions) => functions,
        None => {
            debug!(extension = E::NAME, "extension has no functions");
            return Ok(());
        }
    };

    for scalar in functions.scalar {
        for name in std::iter::once(scalar.name).chain(scalar.aliases.iter().copied()) {
            debug!(
                extension = E::NAME,
                function = name,
                signature = %scalar.function.signature(),
                "registering scalar function"
            );
            scalar.function.register(conn, name).map_err(|e| {
                DbError::with_source("Failed to register scalar function", Box::new(e))
                    .with_field("function", name)
            })?;
        }
    }

    for table in functions.table {
        for name in std::iter::once(table.name).chain(table.aliases.iter().copied()) {
            debug!(
                extension = E::NAME,
                function = name,
                signature = %table.function.signature(),
                "registering table function"
            );
            table.function.register(conn, name).map_err(|e| {
                DbError::with_source("Failed to register table function", Box::new(e))
                    .with_field("function", name)
            })?;
        }
    }

    info!(
        extension = E::NAME,
        version = E::VERSION,
        scalar_functions = functions.scalar.len(),
        table_functions = functions.table.len(),
        "registered extension"
    );

    Ok(())
}
