pub mod documentation;
pub mod function_set;
pub mod scalar;
pub mod table;

use std::fmt;

use duckdb::core::{LogicalTypeHandle, LogicalTypeId};

/// Data types that functions in this extension accept or produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataTypeId {
    Utf8,
    Int32,
    /// Return "type" of a table function.
    Table,
}

impl DataTypeId {
    /// The name DuckDB uses for this type.
    pub const fn sql_name(&self) -> &'static str {
        match self {
            Self::Utf8 => "VARCHAR",
            Self::Int32 => "INTEGER",
            Self::Table => "TABLE",
        }
    }

    /// Get the DuckDB logical type for this type.
    ///
    /// Returns None for `Table` which isn't a column type.
    pub fn logical_type(&self) -> Option<LogicalTypeHandle> {
        match self {
            Self::Utf8 => Some(LogicalTypeHandle::from(LogicalTypeId::Varchar)),
            Self::Int32 => Some(LogicalTypeHandle::from(LogicalTypeId::Integer)),
            Self::Table => None,
        }
    }
}

impl fmt::Display for DataTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Function signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Expected positional input argument types for this signature.
    pub positional_args: &'static [DataTypeId],
    /// The return type.
    ///
    /// For table functions this is `DataTypeId::Table`, the columns are
    /// decided during bind.
    pub return_type: DataTypeId,
}

impl Signature {
    pub const fn new(inputs: &'static [DataTypeId], return_type: DataTypeId) -> Self {
        Signature {
            positional_args: inputs,
            return_type,
        }
    }

    /// Logical types for the positional arguments, in order.
    pub fn logical_args(&self) -> Vec<LogicalTypeHandle> {
        self.positional_args
            .iter()
            .filter_map(|arg| arg.logical_type())
            .collect()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (idx, arg) in self.positional_args.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_display() {
        let sig = Signature::new(&[DataTypeId::Utf8], DataTypeId::Utf8);
        assert_eq!("(VARCHAR) -> VARCHAR", sig.to_string());

        let sig = Signature::new(&[], DataTypeId::Table);
        assert_eq!("() -> TABLE", sig.to_string());
    }

    #[test]
    fn table_is_not_a_column_type() {
        assert!(DataTypeId::Table.logical_type().is_none());
        assert!(DataTypeId::Utf8.logical_type().is_some());

        let sig = Signature::new(&[DataTypeId::Utf8, DataTypeId::Int32], DataTypeId::Table);
        assert_eq!(2, sig.logical_args().len());
    }
}
