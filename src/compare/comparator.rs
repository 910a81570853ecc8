//! The core diff engine: merged desired tables vs. the live schema.

use std::collections::BTreeMap;

use crate::error::SchemaPlanError;
use crate::reader::{ActualColumn, Connection, SchemaReader};
use crate::schema::{ColumnDescriptor, DesiredForeignKey, DesiredIndex, DesiredTable};

use super::types::{
    ColumnCompareResult, CompareOp, ForeignKeyCompareResult, IndexCompareResult,
    TableCompareResult,
};

/// Knobs for one comparison run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareOptions {
    /// Propose `delete` for actual tables no desired entity maps to.
    /// Off by default: coexisting external tables are common, so drops are
    /// strictly opt-in.
    pub include_drops: bool,
}

/// Compare the merged desired tables against the actual schema.
///
/// Desired tables absent from the database become `create` results whose
/// children are all `create`. Present tables are diffed column by column,
/// index by index, key by key; a present table with zero child changes is
/// omitted from the output entirely, so comparing a schema against itself
/// yields an empty plan. Existence is decided from the table listing, never
/// from column-list emptiness.
pub fn compare<C: Connection>(
    desired_tables: &BTreeMap<String, DesiredTable>,
    reader: &mut SchemaReader<'_, C>,
    options: &CompareOptions,
) -> Result<Vec<TableCompareResult>, SchemaPlanError> {
    let actual_names = reader.table_names()?;
    let mut results = Vec::new();

    for (table_name, desired) in desired_tables {
        if actual_names.iter().any(|n| n == table_name) {
            if let Some(result) = diff_table(desired, reader) {
                results.push(result);
            }
        } else {
            results.push(create_table(desired));
        }
    }

    if options.include_drops {
        for name in &actual_names {
            if !desired_tables.contains_key(name) {
                results.push(TableCompareResult {
                    name: name.clone(),
                    operation: CompareOp::Delete,
                    columns: Vec::new(),
                    indexes: Vec::new(),
                    foreign_keys: Vec::new(),
                    primary_key_columns: Vec::new(),
                });
            }
        }
    }

    Ok(results)
}

/// Result for a table that does not exist yet: every desired column, index,
/// and foreign key as a `create` child.
fn create_table(desired: &DesiredTable) -> TableCompareResult {
    TableCompareResult {
        name: desired.name.clone(),
        operation: CompareOp::Create,
        columns: desired
            .columns
            .values()
            .cloned()
            .map(ColumnCompareResult::create)
            .collect(),
        indexes: desired
            .indexes
            .values()
            .map(|idx| index_result(idx, CompareOp::Create))
            .collect(),
        foreign_keys: desired
            .foreign_keys
            .values()
            .map(|fk| foreign_key_result(fk, CompareOp::Create))
            .collect(),
        primary_key_columns: desired.primary_key_columns.clone(),
    }
}

/// Diff one existing table. Returns `None` when nothing changed.
fn diff_table<C: Connection>(
    desired: &DesiredTable,
    reader: &mut SchemaReader<'_, C>,
) -> Option<TableCompareResult> {
    let actual_columns = reader.columns(&desired.name);
    let actual_indexes = reader.indexes(&desired.name);
    let actual_keys = reader.foreign_keys(&desired.name);

    let mut columns = Vec::new();
    for descriptor in desired.columns.values() {
        match actual_columns.iter().find(|c| c.name == descriptor.name) {
            None => columns.push(ColumnCompareResult::create(descriptor.clone())),
            Some(actual) => {
                if let Some(update) = diff_column(descriptor, actual) {
                    columns.push(update);
                }
            }
        }
    }
    for actual in &actual_columns {
        if !desired.columns.contains_key(&actual.name) {
            columns.push(ColumnCompareResult::delete(actual.clone()));
        }
    }

    let mut indexes = Vec::new();
    for idx in desired.indexes.values() {
        match actual_indexes.get(&idx.name) {
            None => indexes.push(index_result(idx, CompareOp::Create)),
            Some(actual) => {
                // No in-place alter for indexes; any mismatch is a
                // destructive recreate.
                if actual.columns != idx.columns || actual.unique != idx.unique {
                    indexes.push(IndexCompareResult {
                        name: actual.name.clone(),
                        operation: CompareOp::Delete,
                        columns: actual.columns.clone(),
                        unique: actual.unique,
                        concurrently: false,
                    });
                    indexes.push(index_result(idx, CompareOp::Create));
                }
            }
        }
    }
    for (name, actual) in &actual_indexes {
        if !desired.indexes.contains_key(name) {
            indexes.push(IndexCompareResult {
                name: actual.name.clone(),
                operation: CompareOp::Delete,
                columns: actual.columns.clone(),
                unique: actual.unique,
                concurrently: false,
            });
        }
    }

    let mut foreign_keys = Vec::new();
    for fk in desired.foreign_keys.values() {
        match actual_keys.get(&fk.name) {
            None => foreign_keys.push(foreign_key_result(fk, CompareOp::Create)),
            Some(actual) => {
                // Same recreate policy as indexes.
                if actual.column != fk.column
                    || actual.referenced_table != fk.referenced_table
                    || actual.referenced_column != fk.referenced_column
                {
                    foreign_keys.push(ForeignKeyCompareResult {
                        name: actual.name.clone(),
                        operation: CompareOp::Delete,
                        column: actual.column.clone(),
                        referenced_table: actual.referenced_table.clone(),
                        referenced_column: actual.referenced_column.clone(),
                    });
                    foreign_keys.push(foreign_key_result(fk, CompareOp::Create));
                }
            }
        }
    }
    for (name, actual) in &actual_keys {
        if !desired.foreign_keys.contains_key(name) {
            foreign_keys.push(ForeignKeyCompareResult {
                name: actual.name.clone(),
                operation: CompareOp::Delete,
                column: actual.column.clone(),
                referenced_table: actual.referenced_table.clone(),
                referenced_column: actual.referenced_column.clone(),
            });
        }
    }

    let result = TableCompareResult {
        name: desired.name.clone(),
        operation: CompareOp::Update,
        columns,
        indexes,
        foreign_keys,
        primary_key_columns: desired.primary_key_columns.clone(),
    };
    result.has_changes().then_some(result)
}

/// Compare one column present on both sides. Returns an `update` result iff
/// at least one of the four aspects mismatches; a fully matching column
/// yields `None` and is dropped from the tree.
fn diff_column(desired: &ColumnDescriptor, actual: &ActualColumn) -> Option<ColumnCompareResult> {
    let type_matches = desired.column_type == actual.column_type;
    let nullable_matches = desired.nullable == actual.nullable;
    // String compare; a NULL default and an empty-string default differ.
    let default_matches = desired.default == actual.default;
    let length_matches = desired.length == actual.length;

    if type_matches && nullable_matches && default_matches && length_matches {
        return None;
    }
    Some(ColumnCompareResult {
        name: desired.name.clone(),
        operation: CompareOp::Update,
        desired: Some(desired.clone()),
        actual: Some(actual.clone()),
        type_matches,
        nullable_matches,
        default_matches,
        length_matches,
    })
}

fn index_result(idx: &DesiredIndex, operation: CompareOp) -> IndexCompareResult {
    IndexCompareResult {
        name: idx.name.clone(),
        operation,
        columns: idx.columns.clone(),
        unique: idx.unique,
        concurrently: idx.concurrently,
    }
}

fn foreign_key_result(fk: &DesiredForeignKey, operation: CompareOp) -> ForeignKeyCompareResult {
    ForeignKeyCompareResult {
        name: fk.name.clone(),
        operation,
        column: fk.column.clone(),
        referenced_table: fk.referenced_table.clone(),
        referenced_column: fk.referenced_column.clone(),
    }
}
