use std::fmt;

use duckdb::vscalar::VScalar;
use duckdb::vtab::VTab;
use duckdb::Connection;

use super::documentation::Documentation;
use super::Signature;

/// Registers a function implementation under a name with a connection.
type RegisterFn = fn(&Connection, &str) -> duckdb::Result<()>;

/// A named scalar function along with its documentation.
#[derive(Debug, Clone, Copy)]
pub struct ScalarFunctionSet {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub doc: &'static Documentation,
    pub function: RawScalarFunction,
}

/// A named table function along with its documentation.
#[derive(Debug, Clone, Copy)]
pub struct TableFunctionSet {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub doc: &'static Documentation,
    pub function: RawTableFunction,
}

/// Type erased scalar function implementation.
#[derive(Clone, Copy)]
pub struct RawScalarFunction {
    signature: &'static Signature,
    register_fn: RegisterFn,
}

impl RawScalarFunction {
    pub const fn new<F>(signature: &'static Signature) -> Self
    where
        F: VScalar,
        F::State: fmt::Debug,
    {
        RawScalarFunction {
            signature,
            register_fn: register_scalar::<F>,
        }
    }

    pub fn signature(&self) -> &'static Signature {
        self.signature
    }

    pub fn register(&self, conn: &Connection, name: &str) -> duckdb::Result<()> {
        (self.register_fn)(conn, name)
    }
}

impl fmt::Debug for RawScalarFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawScalarFunction")
            .field("signature", self.signature)
            .finish_non_exhaustive()
    }
}

/// Type erased table function implementation.
#[derive(Clone, Copy)]
pub struct RawTableFunction {
    signature: &'static Signature,
    register_fn: RegisterFn,
}

impl RawTableFunction {
    pub const fn new<F>(signature: &'static Signature) -> Self
    where
        F: VTab,
    {
        RawTableFunction {
            signature,
            register_fn: register_table::<F>,
        }
    }

    pub fn signature(&self) -> &'static Signature {
        self.signature
    }

    pub fn register(&self, conn: &Connection, name: &str) -> duckdb::Result<()> {
        (self.register_fn)(conn, name)
    }
}

impl fmt::Debug for RawTableFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawTableFunction")
            .field("signature", self.signature)
            .finish_non_exhaustive()
    }
}

fn register_scalar<F>(conn: &Connection, name: &str) -> duckdb::Result<()>
where
    F: VScalar,
    F::State: fmt::Debug,
{
    conn.register_scalar_function::<F>(name)
}

fn register_table<F>(conn: &Connection, name: &str) -> duckdb::Result<()>
where
    F: VTab,
{
    conn.register_table_function::<F>(name)
}
