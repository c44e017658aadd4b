use std::error::Error;

use duckdb::core::{DataChunkHandle, LogicalTypeHandle, LogicalTypeId};
use duckdb::vscalar::{ScalarFunctionSignature, VScalar};
use duckdb::vtab::arrow::WritableVector;

use super::execute_unary_utf8;
use crate::functions::documentation::{Category, Documentation, Example};
use crate::functions::function_set::{RawScalarFunction, ScalarFunctionSet};
use crate::functions::{DataTypeId, Signature};

const SIGNATURE: Signature = Signature::new(&[DataTypeId::Utf8], DataTypeId::Utf8);

pub const FUNCTION_SET_BIGTABLE2_OPENSSL_VERSION: ScalarFunctionSet = ScalarFunctionSet {
    name: "bigtable2_openssl_version",
    aliases: &[],
    doc: &Documentation {
        category: Category::System,
        description: "Greet the input and report the version of the OpenSSL library linked into the extension.",
        arguments: &["name"],
        example: Some(Example {
            example: "bigtable2_openssl_version('dog')",
            output: "Bigtable2 dog, my linked OpenSSL version is OpenSSL <version>",
        }),
    },
    function: RawScalarFunction::new::<Bigtable2OpensslVersion>(&SIGNATURE),
};

/// Version text of the linked OpenSSL library, "OpenSSL <version> <release date>".
pub fn linked_openssl_version() -> &'static str {
    openssl::version::version()
}

pub fn format_openssl_version(name: &str, version: &str, buf: &mut String) {
    buf.push_str("Bigtable2 ");
    buf.push_str(name);
    buf.push_str(", my linked OpenSSL version is ");
    buf.push_str(version);
}

#[derive(Debug, Clone, Copy)]
pub struct Bigtable2OpensslVersion;

impl VScalar for Bigtable2OpensslVersion {
    type State = ();

    unsafe fn invoke(
        _state: &Self::State,
        input: &mut DataChunkHandle,
        output: &mut dyn WritableVector,
    ) -> Result<(), Box<dyn Error>> {
        let version = linked_openssl_version();
        execute_unary_utf8(input, output, |name, buf| {
            format_openssl_version(name, version, buf)
        });
        Ok(())
    }

    fn signatures() -> Vec<ScalarFunctionSignature> {
        vec![ScalarFunctionSignature::exact(
            SIGNATURE.logical_args(),
            LogicalTypeHandle::from(LogicalTypeId::Varchar),
        )]
    }
}
