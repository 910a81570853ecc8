//! Shared-table merge.
//!
//! Multiple entities may map onto one physical table (single-table
//! inheritance, attachable behaviors). Before diffing, their projections are
//! folded into one [`DesiredTable`] per table name. Conflicting declarations
//! are configuration errors, never resolved by precedence.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::error::SchemaPlanError;

use super::{ColumnDescriptor, ColumnType, EntityProjection, ForeignKeyDef, IndexDef};

/// A desired index keyed by its resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredIndex {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub concurrently: bool,
}

impl DesiredIndex {
    fn from_def(def: &IndexDef) -> Self {
        Self {
            name: def.resolved_name(),
            columns: def.columns.clone(),
            unique: def.unique,
            concurrently: def.concurrently,
        }
    }
}

/// A desired foreign key keyed by its resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredForeignKey {
    pub name: String,
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

impl DesiredForeignKey {
    fn from_def(table: &str, def: &ForeignKeyDef) -> Self {
        Self {
            name: def.resolved_name(table),
            column: def.column.clone(),
            referenced_table: def.referenced_table.clone(),
            referenced_column: def.referenced_column.clone(),
        }
    }
}

/// The merged desired state of one physical table.
#[derive(Debug, Clone)]
pub struct DesiredTable {
    pub name: String,
    /// Columns in first-declared order, keyed by column name.
    pub columns: IndexMap<String, ColumnDescriptor>,
    pub primary_key_columns: Vec<String>,
    pub indexes: IndexMap<String, DesiredIndex>,
    pub foreign_keys: IndexMap<String, DesiredForeignKey>,
}

impl DesiredTable {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: IndexMap::new(),
            primary_key_columns: Vec::new(),
            indexes: IndexMap::new(),
            foreign_keys: IndexMap::new(),
        }
    }
}

/// Fold entity projections into one desired table per table name.
///
/// Columns are unioned by name; two entities declaring the same column with
/// different type, length, or nullability is a fatal
/// [`SchemaPlanError::ColumnConflict`]. Indexes and foreign keys are
/// unioned by resolved name; a same-name redeclaration must be identical or
/// it is a fatal [`SchemaPlanError::NameCollision`]. Primary-key columns
/// are unioned and deduplicated in first-seen order.
///
/// A soft-delete flag materializes a nullable `datetime` column of the
/// given name unless some entity declared that column itself.
pub fn merge_projections(
    projections: &[EntityProjection],
) -> Result<BTreeMap<String, DesiredTable>, SchemaPlanError> {
    // Track which entity first declared each column, for conflict messages.
    let mut declared_by: BTreeMap<(String, String), String> = BTreeMap::new();
    let mut tables: BTreeMap<String, DesiredTable> = BTreeMap::new();

    for projection in projections {
        let table = tables
            .entry(projection.table_name.clone())
            .or_insert_with(|| DesiredTable::new(&projection.table_name));

        for column in &projection.columns {
            let key = (projection.table_name.clone(), column.name.clone());
            match table.columns.get(&column.name) {
                None => {
                    declared_by.insert(key, projection.entity_name.clone());
                    table.columns.insert(column.name.clone(), column.clone());
                }
                Some(existing) => {
                    if existing.column_type != column.column_type
                        || existing.length != column.length
                        || existing.nullable != column.nullable
                    {
                        let first_entity = declared_by
                            .get(&key)
                            .cloned()
                            .unwrap_or_else(|| "<unknown>".to_string());
                        return Err(SchemaPlanError::ColumnConflict {
                            table: projection.table_name.clone(),
                            column: column.name.clone(),
                            first_entity,
                            first: existing.summary(),
                            second_entity: projection.entity_name.clone(),
                            second: column.summary(),
                        });
                    }
                    // Identical on type/length/nullable: the first-declared
                    // descriptor (including its default) wins.
                }
            }
        }

        for pk in &projection.primary_key_columns {
            if !table.primary_key_columns.contains(pk) {
                table.primary_key_columns.push(pk.clone());
            }
        }

        for def in &projection.indexes {
            let desired = DesiredIndex::from_def(def);
            match table.indexes.get(&desired.name) {
                None => {
                    table.indexes.insert(desired.name.clone(), desired);
                }
                Some(existing) if *existing == desired => {}
                Some(_) => {
                    return Err(SchemaPlanError::NameCollision {
                        kind: "index",
                        table: projection.table_name.clone(),
                        name: desired.name,
                    });
                }
            }
        }

        for def in &projection.foreign_keys {
            let desired = DesiredForeignKey::from_def(&projection.table_name, def);
            match table.foreign_keys.get(&desired.name) {
                None => {
                    table.foreign_keys.insert(desired.name.clone(), desired);
                }
                Some(existing) if *existing == desired => {}
                Some(_) => {
                    return Err(SchemaPlanError::NameCollision {
                        kind: "foreign key",
                        table: projection.table_name.clone(),
                        name: desired.name,
                    });
                }
            }
        }

        if let Some(soft_delete) = &projection.soft_delete {
            if !table.columns.contains_key(&soft_delete.column_name) {
                let mut column =
                    ColumnDescriptor::new(&soft_delete.column_name, ColumnType::DateTime);
                column.nullable = true;
                declared_by.insert(
                    (projection.table_name.clone(), column.name.clone()),
                    projection.entity_name.clone(),
                );
                table.columns.insert(column.name.clone(), column);
            }
        }
    }

    Ok(tables)
}
