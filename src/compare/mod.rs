//! Schema Comparator: diff merged desired tables against the live schema
//! and emit the compare-result tree.

mod comparator;
pub mod report;
mod types;

pub use comparator::{compare, CompareOptions};
pub use types::{
    ColumnCompareResult, CompareOp, ForeignKeyCompareResult, IndexCompareResult,
    TableCompareResult,
};
