use std::error::Error;

use duckdb::core::{DataChunkHandle, LogicalTypeHandle, LogicalTypeId};
use duckdb::vscalar::{ScalarFunctionSignature, VScalar};
use duckdb::vtab::arrow::WritableVector;

use super::execute_unary_utf8;
use crate::functions::documentation::{Category, Documentation, Example};
use crate::functions::function_set::{RawScalarFunction, ScalarFunctionSet};
use crate::functions::{DataTypeId, Signature};

const SIGNATURE: Signature = Signature::new(&[DataTypeId::Utf8], DataTypeId::Utf8);

pub const FUNCTION_SET_BIGTABLE2: ScalarFunctionSet = ScalarFunctionSet {
    name: "bigtable2",
    aliases: &[],
    doc: &Documentation {
        category: Category::String,
        description: "Greet the input with the bigtable2 prefix and a chick.",
        arguments: &["name"],
        example: Some(Example {
            example: "bigtable2('dog')",
            output: "Bigtable2 dog 🐥",
        }),
    },
    function: RawScalarFunction::new::<Bigtable2>(&SIGNATURE),
};

const PREFIX: &str = "Bigtable2 ";
const SUFFIX: &str = " 🐥";

/// Write the greeting for `name` into `buf`.
pub fn format_bigtable2(name: &str, buf: &mut String) {
    buf.reserve(PREFIX.len() + name.len() + SUFFIX.len());
    buf.push_str(PREFIX);
    buf.push_str(name);
    buf.push_str(SUFFIX);
}

#[derive(Debug, Clone, Copy)]
pub struct Bigtable2;

impl VScalar for Bigtable2 {
    type State = ();

    unsafe fn invoke(
        _state: &Self::State,
        input: &mut DataChunkHandle,
        output: &mut dyn WritableVector,
    ) -> Result<(), Box<dyn Error>> {
        execute_unary_utf8(input, output, format_bigtable2);
        Ok(())
    }

    fn signatures() -> Vec<ScalarFunctionSignature> {
        vec![ScalarFunctionSignature::exact(
            SIGNATURE.logical_args(),
            LogicalTypeHandle::from(LogicalTypeId::Varchar),
        )]
    }
}

/// Convenience for callers that want an owned string.
pub fn bigtable2(name: &str) -> String {
    let mut buf = String::new();
    format_bigtable2(name, &mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greets_dog() {
        assert_eq!("Bigtable2 dog 🐥", bigtable2("dog"));
    }

    #[test]
    fn empty_input() {
        assert_eq!("Bigtable2  🐥", bigtable2(""));
    }

    #[test]
    fn reuses_buffer() {
        let mut buf = String::new();
        for name in ["a", "longer name", "ü"] {
            buf.clear();
            format_bigtable2(name, &mut buf);
            assert_eq!(format!("Bigtable2 {name} 🐥"), buf);
        }
    }

    #[test]
    fn function_set_metadata() {
        assert_eq!("bigtable2", FUNCTION_SET_BIGTABLE2.name);
        assert_eq!(
            "(VARCHAR) -> VARCHAR",
            FUNCTION_SET_BIGTABLE2.function.signature().to_string()
        );
        let example = FUNCTION_SET_BIGTABLE2.doc.example.unwrap();
        assert_eq!(bigtable2("dog"), example.output);
    }
}
