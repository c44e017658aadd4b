pub mod bigtable2;
pub mod openssl_version;

use duckdb::core::{DataChunkHandle, Inserter};
use duckdb::ffi::duckdb_string_t;
use duckdb::types::DuckString;
use duckdb::vtab::arrow::WritableVector;

/// Execute a string to string function over the first column of `input`.
///
/// `op` receives each non-null input value and a cleared buffer to write the
/// result into. Null inputs produce null outputs without calling `op`.
pub fn execute_unary_utf8<F>(input: &DataChunkHandle, output: &mut dyn WritableVector, mut op: F)
where
    F: FnMut(&str, &mut String),
{
    let len = input.len();
    let values = input.flat_vector(0);
    let strings = values.as_slice_with_len::<duckdb_string_t>(len);

    let mut out = output.flat_vector();
    let mut buf = String::new();

    for (idx, value) in strings.iter().enumerate() {
        if values.row_is_null(idx as u64) {
            out.set_null(idx);
            continue;
        }

        let mut raw = *value;
        let mut s = DuckString::new(&mut raw);
        let text = s.as_str();

        buf.clear();
        op(&*text, &mut buf);
        out.insert(idx, buf.as_str());
    }
}
