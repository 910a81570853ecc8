//! Value types describing the desired schema.
//!
//! These are plain immutable descriptors handed over by an external metadata
//! resolver; this crate never inspects entity classes itself.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::SchemaPlanError;
use crate::naming;

/// Semantic column type.
///
/// Closed set of the types entity metadata can declare, plus `Other` for raw
/// database types that pass through normalization unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Int,
    BigInt,
    Bool,
    Decimal,
    Float,
    Date,
    DateTime,
    Json,
    Uuid,
    Other(String),
}

impl ColumnType {
    /// Parse a raw (already unparenthesized) type string. Known semantic
    /// names map to their variant; anything else maps to itself.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "string" => ColumnType::String,
            "int" | "integer" => ColumnType::Int,
            "bigint" => ColumnType::BigInt,
            "bool" | "boolean" => ColumnType::Bool,
            "decimal" | "numeric" => ColumnType::Decimal,
            "float" | "double" => ColumnType::Float,
            "date" => ColumnType::Date,
            "datetime" | "timestamp" => ColumnType::DateTime,
            "json" | "jsonb" => ColumnType::Json,
            "uuid" => ColumnType::Uuid,
            other => ColumnType::Other(other.to_string()),
        }
    }

    /// Stable name used in reports and error messages.
    pub fn name(&self) -> &str {
        match self {
            ColumnType::String => "string",
            ColumnType::Int => "int",
            ColumnType::BigInt => "bigint",
            ColumnType::Bool => "bool",
            ColumnType::Decimal => "decimal",
            ColumnType::Float => "float",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Json => "json",
            ColumnType::Uuid => "uuid",
            ColumnType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a column's value is produced when not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    #[default]
    None,
    AutoIncrement,
    Uuid,
    Ulid,
    Sequence,
}

/// Desired definition of a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    /// Default value as its SQL literal text. `None` is distinct from
    /// `Some("")`.
    pub default: Option<String>,
    pub length: Option<u32>,
    pub generator: GeneratorKind,
    /// Backing sequence, when `generator` is [`GeneratorKind::Sequence`].
    pub sequence_name: Option<String>,
    pub primary_key: bool,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
            length: None,
            generator: GeneratorKind::None,
            sequence_name: None,
            primary_key: false,
        }
    }

    /// Short `type(length) null/not-null` rendering for conflict messages.
    pub(crate) fn summary(&self) -> String {
        let length = self
            .length
            .map(|l| format!("({})", l))
            .unwrap_or_default();
        let nullable = if self.nullable { "null" } else { "not null" };
        format!("{}{} {}", self.column_type, length, nullable)
    }
}

/// Desired index definition, as declared on an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub columns: Vec<String>,
    pub unique: bool,
    /// Overrides the generated `<cols>_idx` name when present.
    pub explicit_name: Option<String>,
    /// Ask the executor for a non-blocking build (`CREATE INDEX
    /// CONCURRENTLY` on backends that support it).
    pub concurrently: bool,
}

impl IndexDef {
    pub fn on<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
            explicit_name: None,
            concurrently: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// The name this index resolves to, honoring the explicit override and
    /// the identifier-length guard.
    pub fn resolved_name(&self) -> String {
        naming::index_name(&self.columns, self.explicit_name.as_deref())
    }
}

/// Desired foreign-key definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

impl ForeignKeyDef {
    pub fn new(column: impl Into<String>, referenced_table: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            referenced_table: referenced_table.into(),
            referenced_column: "id".to_string(),
        }
    }

    /// Foreign key implied by a to-one relation property: the owning column
    /// is derived from the property name (`author` -> `author_id`).
    pub fn for_relation(property: &str, referenced_table: impl Into<String>) -> Self {
        Self::new(naming::relation_column_name(property), referenced_table)
    }

    pub fn resolved_name(&self, table: &str) -> String {
        naming::foreign_key_name(table, &self.referenced_table, &self.column)
    }
}

/// Soft-delete marker: the table carries a nullable timestamp column of
/// this name instead of physically deleting rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftDelete {
    pub column_name: String,
}

/// Everything the metadata resolver projects for one entity.
///
/// Several entities may project onto the same `table_name`; see
/// [`merge_projections`](crate::schema::merge_projections).
#[derive(Debug, Clone)]
pub struct EntityProjection {
    pub entity_name: String,
    pub table_name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub primary_key_columns: Vec<String>,
    pub indexes: Vec<IndexDef>,
    pub foreign_keys: Vec<ForeignKeyDef>,
    pub soft_delete: Option<SoftDelete>,
}

impl EntityProjection {
    pub fn new(entity_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            table_name: table_name.into(),
            columns: Vec::new(),
            primary_key_columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            soft_delete: None,
        }
    }
}

/// Check that a relation property points at a known entity.
///
/// The metadata resolver calls this before projecting a relation; a miss is
/// the fatal "non-entity found in relation" configuration error, never a
/// silent skip.
pub fn validate_relation_target(
    known_entities: &BTreeSet<String>,
    entity: &str,
    property: &str,
    target: &str,
) -> Result<(), SchemaPlanError> {
    if known_entities.contains(target) {
        Ok(())
    } else {
        Err(SchemaPlanError::NonEntityRelation {
            entity: entity.to_string(),
            property: property.to_string(),
            target: target.to_string(),
        })
    }
}
