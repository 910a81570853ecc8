//! Schema Reader: introspects a live database into a normalized
//! actual-schema snapshot (tables, columns, indexes, foreign keys).

mod connection;
mod queries;

pub use connection::{Connection, Row, Value};
pub use queries::IntrospectionQueries;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SchemaPlanError;
use crate::naming;
use crate::schema::ColumnType;

/// Bookkeeping table written by the migration runner; never reported as a
/// user table.
pub const MIGRATIONS_TABLE: &str = "migrations";

/// `<base>(<digits>)`, e.g. `varchar(255)`.
static PARENTHESIZED_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_ ]*)\((\d+)\)\s*$").unwrap());

/// A column as it exists in the database, after type normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ActualColumn {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub default: Option<String>,
    pub length: Option<u32>,
}

/// An index as it exists in the database: ordered columns plus uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualIndex {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// A single-column foreign key as it exists in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualForeignKey {
    pub name: String,
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Existence and shape of one table, made explicit so callers never have to
/// infer "absent" from an empty column list.
#[derive(Debug, Clone, PartialEq)]
pub enum TableState {
    Absent,
    PresentEmpty,
    Present(Vec<ActualColumn>),
}

/// Split a raw database type into a semantic type plus explicit length.
///
/// Anything of the form `base(digits)` becomes `string` with that length;
/// every other raw type maps to itself with no length.
pub fn normalize_type(raw: &str) -> (ColumnType, Option<u32>) {
    if let Some(caps) = PARENTHESIZED_TYPE.captures(raw) {
        let length = caps[2].parse::<u32>().ok();
        (ColumnType::String, length)
    } else {
        (ColumnType::parse(raw.trim()), None)
    }
}

/// Reads the actual schema through a [`Connection`], issuing the statement
/// set matching the connection's driver.
pub struct SchemaReader<'a, C: Connection> {
    conn: &'a mut C,
    queries: IntrospectionQueries,
}

impl<'a, C: Connection> SchemaReader<'a, C> {
    pub fn new(conn: &'a mut C) -> Result<Self, SchemaPlanError> {
        let queries = IntrospectionQueries::for_driver(conn.driver_name())?;
        Ok(Self { conn, queries })
    }

    /// Names of user tables in the current database, sorted, excluding the
    /// migrations bookkeeping table. A failure here aborts planning: without
    /// the table set, create-vs-update cannot be decided.
    pub fn table_names(&mut self) -> Result<Vec<String>, SchemaPlanError> {
        let rows = self
            .conn
            .execute_query(self.queries.list_tables, &[])
            .map_err(|e| SchemaPlanError::Introspection {
                message: e.to_string(),
            })?;
        let mut names: Vec<String> = rows
            .iter()
            .filter_map(|row| row.text("table_name"))
            .filter(|name| *name != MIGRATIONS_TABLE)
            .map(|name| name.to_string())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Columns of `table` in ordinal order. A failing query (e.g. the table
    /// does not exist) is contained to an empty vec; use [`table_state`]
    /// when existence matters.
    ///
    /// [`table_state`]: SchemaReader::table_state
    pub fn columns(&mut self, table: &str) -> Vec<ActualColumn> {
        let rows = match self
            .conn
            .execute_query(self.queries.list_columns, &[Value::from(table)])
        {
            Ok(rows) => rows,
            Err(_) => return Vec::new(),
        };
        rows.iter()
            .filter_map(|row| {
                let name = row.text("column_name")?.to_string();
                let raw_type = row.text("data_type").unwrap_or("");
                let (column_type, length) = normalize_type(raw_type);
                Some(ActualColumn {
                    name,
                    column_type,
                    nullable: row.boolean("is_nullable").unwrap_or(true),
                    default: row.text("column_default").map(|d| d.to_string()),
                    length,
                })
            })
            .collect()
    }

    /// Explicit tri-state existence check for one table, combining the
    /// table listing with the column query.
    pub fn table_state(&mut self, table: &str) -> Result<TableState, SchemaPlanError> {
        let names = self.table_names()?;
        if !names.iter().any(|n| n == table) {
            return Ok(TableState::Absent);
        }
        let columns = self.columns(table);
        if columns.is_empty() {
            Ok(TableState::PresentEmpty)
        } else {
            Ok(TableState::Present(columns))
        }
    }

    /// Indexes of `table`, one entry per index name. The catalog returns one
    /// row per (index, column); rows are grouped by name with column order
    /// preserved as first encountered. Contained to empty on failure, like
    /// [`columns`](SchemaReader::columns).
    pub fn indexes(&mut self, table: &str) -> IndexMap<String, ActualIndex> {
        let rows = match self
            .conn
            .execute_query(self.queries.list_indexes, &[Value::from(table)])
        {
            Ok(rows) => rows,
            Err(_) => return IndexMap::new(),
        };
        let mut indexes: IndexMap<String, ActualIndex> = IndexMap::new();
        for row in &rows {
            let (name, column) = match (row.text("index_name"), row.text("column_name")) {
                (Some(n), Some(c)) => (n.to_string(), c.to_string()),
                _ => continue,
            };
            let unique = row.boolean("is_unique").unwrap_or(false);
            let entry = indexes.entry(name.clone()).or_insert_with(|| ActualIndex {
                name,
                columns: Vec::new(),
                unique,
            });
            entry.columns.push(column);
        }
        indexes
    }

    /// Foreign keys of `table`, keyed by constraint name. Backends that do
    /// not expose constraint names (sqlite) get the deterministic
    /// `fk_<table>_<referenced>_<column>` name synthesized, which is also
    /// the name the comparator matches desired keys under.
    pub fn foreign_keys(&mut self, table: &str) -> IndexMap<String, ActualForeignKey> {
        let rows = match self
            .conn
            .execute_query(self.queries.list_foreign_keys, &[Value::from(table)])
        {
            Ok(rows) => rows,
            Err(_) => return IndexMap::new(),
        };
        let mut keys: IndexMap<String, ActualForeignKey> = IndexMap::new();
        for row in &rows {
            let column = match row.text("column_name") {
                Some(c) => c.to_string(),
                None => continue,
            };
            let referenced_table = row.text("referenced_table").unwrap_or("").to_string();
            let referenced_column = row.text("referenced_column").unwrap_or("id").to_string();
            let name = match row.text("constraint_name") {
                Some(n) => n.to_string(),
                None => naming::foreign_key_name(table, &referenced_table, &column),
            };
            keys.entry(name.clone()).or_insert(ActualForeignKey {
                name,
                column,
                referenced_table,
                referenced_column,
            });
        }
        keys
    }
}
