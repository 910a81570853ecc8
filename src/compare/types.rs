//! Compare-result model: the typed diff tree handed to the DDL generator.
//!
//! Field names and the three operation values are the stable contract with
//! the external migration generator; no wire format is mandated.

use std::fmt;

use crate::reader::ActualColumn;
use crate::schema::ColumnDescriptor;

/// The closed set of structural operations. Index and foreign-key changes
/// never use `Update`; they are expressed as a `Delete` + `Create` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Create,
    Update,
    Delete,
}

impl CompareOp {
    /// Stable lowercase name, part of the output contract.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Create => "create",
            CompareOp::Update => "update",
            CompareOp::Delete => "delete",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Required change for one column.
///
/// `Create` carries only `desired`, `Delete` only `actual`, `Update` both.
/// An `Update` always has at least one match flag set to false; no-op
/// columns are dropped from the tree rather than emitted.
#[derive(Debug, Clone)]
pub struct ColumnCompareResult {
    pub name: String,
    pub operation: CompareOp,
    pub desired: Option<ColumnDescriptor>,
    pub actual: Option<ActualColumn>,
    pub type_matches: bool,
    pub nullable_matches: bool,
    pub default_matches: bool,
    pub length_matches: bool,
}

impl ColumnCompareResult {
    pub(crate) fn create(desired: ColumnDescriptor) -> Self {
        Self {
            name: desired.name.clone(),
            operation: CompareOp::Create,
            desired: Some(desired),
            actual: None,
            type_matches: true,
            nullable_matches: true,
            default_matches: true,
            length_matches: true,
        }
    }

    pub(crate) fn delete(actual: ActualColumn) -> Self {
        Self {
            name: actual.name.clone(),
            operation: CompareOp::Delete,
            desired: None,
            actual: Some(actual),
            type_matches: true,
            nullable_matches: true,
            default_matches: true,
            length_matches: true,
        }
    }
}

/// Required change for one index. Columns are order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCompareResult {
    pub name: String,
    pub operation: CompareOp,
    pub columns: Vec<String>,
    pub unique: bool,
    /// Build without blocking writers, where the backend supports it.
    pub concurrently: bool,
}

/// Required change for one single-column foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyCompareResult {
    pub name: String,
    pub operation: CompareOp,
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Required changes for one table, nesting column, index, and foreign-key
/// results. A `Create` table contains only `Create` children; a `Delete`
/// table has no children.
#[derive(Debug, Clone)]
pub struct TableCompareResult {
    pub name: String,
    pub operation: CompareOp,
    pub columns: Vec<ColumnCompareResult>,
    pub indexes: Vec<IndexCompareResult>,
    pub foreign_keys: Vec<ForeignKeyCompareResult>,
    /// Carried verbatim from the desired projection; primary-key changes
    /// surface through the underlying column's operation.
    pub primary_key_columns: Vec<String>,
}

impl TableCompareResult {
    /// True when any child change is present. For `Create` and `Delete`
    /// tables the operation itself is the change.
    pub fn has_changes(&self) -> bool {
        self.operation != CompareOp::Update
            || !self.columns.is_empty()
            || !self.indexes.is_empty()
            || !self.foreign_keys.is_empty()
    }
}
