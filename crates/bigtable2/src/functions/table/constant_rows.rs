use std::error::Error;

use duckdb::core::{DataChunkHandle, LogicalTypeHandle, LogicalTypeId};
use duckdb::vtab::{BindInfo, InitInfo, TableFunctionInfo, VTab};

use super::OnceScanState;
use crate::functions::documentation::{Category, Documentation};
use crate::functions::function_set::{RawTableFunction, TableFunctionSet};
use crate::functions::{DataTypeId, Signature};

const SIGNATURE: Signature = Signature::new(&[DataTypeId::Utf8], DataTypeId::Table);

pub const FUNCTION_SET_BIGTABLE2_SCAN: TableFunctionSet = TableFunctionSet {
    name: "bigtable2",
    aliases: &[],
    doc: &Documentation {
        category: Category::Table,
        description: "Produce the rows 1 and 2 in a single INTEGER column. The argument is accepted but not used.",
        arguments: &["table_name"],
        example: None,
    },
    function: RawTableFunction::new::<ConstantRows>(&SIGNATURE),
};

/// Values emitted by a scan, in order.
pub const CONSTANT_ROWS: [i32; 2] = [1, 2];

pub const COLUMN_NAME: &str = "col1";

#[derive(Debug)]
pub struct ConstantRowsBindData;

#[derive(Debug, Default)]
pub struct ConstantRowsInitData {
    state: OnceScanState,
}

impl ConstantRowsInitData {
    /// Write the next set of rows into `out`, returning how many were
    /// written. Zero means the scan is exhausted.
    ///
    /// `out` must be able to hold all constant rows.
    pub fn poll_pull(&self, out: &mut [i32]) -> usize {
        if !self.state.poll_once() {
            return 0;
        }

        out[..CONSTANT_ROWS.len()].copy_from_slice(&CONSTANT_ROWS);
        CONSTANT_ROWS.len()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConstantRows;

impl VTab for ConstantRows {
    type BindData = ConstantRowsBindData;
    type InitData = ConstantRowsInitData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        bind.add_result_column(COLUMN_NAME, LogicalTypeHandle::from(LogicalTypeId::Integer));
        Ok(ConstantRowsBindData)
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(ConstantRowsInitData::default())
    }

    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let init_data = func.get_init_data();

        let mut vector = output.flat_vector(0);
        let count = init_data.poll_pull(vector.as_mut_slice::<i32>());
        output.set_len(count);

        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(SIGNATURE.logical_args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_rows_then_finishes() {
        let init = ConstantRowsInitData::default();
        let mut out = [0; 8];

        let count = init.poll_pull(&mut out);
        assert_eq!(&[1, 2], &out[..count]);

        assert_eq!(0, init.poll_pull(&mut out));
        assert_eq!(0, init.poll_pull(&mut out));
    }
}
