use std::error::Error;

use duckdb::core::{DataChunkHandle, Inserter, LogicalTypeHandle, LogicalTypeId};
use duckdb::vtab::{BindInfo, InitInfo, TableFunctionInfo, VTab};

use super::{varchar_parameter, OnceScanState};
use crate::functions::documentation::{Category, Documentation, Example};
use crate::functions::function_set::{RawTableFunction, TableFunctionSet};
use crate::functions::{DataTypeId, Signature};

const SIGNATURE: Signature = Signature::new(&[DataTypeId::Utf8], DataTypeId::Table);

pub const FUNCTION_SET_BIGTABLE2_HELLO: TableFunctionSet = TableFunctionSet {
    name: "bigtable2_hello",
    aliases: &["hello"],
    doc: &Documentation {
        category: Category::Table,
        description: "Produce a single row greeting the given name.",
        arguments: &["name"],
        example: Some(Example {
            example: "SELECT * FROM bigtable2_hello('duck')",
            output: "Hello duck",
        }),
    },
    function: RawTableFunction::new::<Hello>(&SIGNATURE),
};

pub const COLUMN_NAME: &str = "column0";

#[derive(Debug)]
pub struct HelloBindData {
    /// None if the function was called with NULL.
    name: Option<String>,
}

impl HelloBindData {
    pub fn new(name: Option<String>) -> Self {
        HelloBindData { name }
    }

    /// The single output value, NULL for a NULL name.
    pub fn greeting(&self) -> Option<String> {
        self.name.as_ref().map(|name| format!("Hello {name}"))
    }
}

#[derive(Debug, Default)]
pub struct HelloInitData {
    state: OnceScanState,
}

#[derive(Debug, Clone, Copy)]
pub struct Hello;

impl VTab for Hello {
    type BindData = HelloBindData;
    type InitData = HelloInitData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        bind.add_result_column(COLUMN_NAME, LogicalTypeHandle::from(LogicalTypeId::Varchar));
        Ok(HelloBindData::new(varchar_parameter(bind, 0)))
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(HelloInitData::default())
    }

    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let init_data = func.get_init_data();
        let bind_data = func.get_bind_data();

        if init_data.state.poll_once() {
            let mut vector = output.flat_vector(0);
            match bind_data.greeting() {
                Some(greeting) => vector.insert(0, greeting.as_str()),
                None => vector.set_null(0),
            }
            output.set_len(1);
        } else {
            output.set_len(0);
        }

        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(SIGNATURE.logical_args())
    }
}
