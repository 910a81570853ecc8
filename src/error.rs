//! Error types for schema-planner

use thiserror::Error;

/// Errors that can occur while building a schema plan.
///
/// Configuration errors (`ColumnConflict`, `NameCollision`,
/// `NonEntityRelation`) are fatal: the comparison aborts and no partial plan
/// is returned. A failing column query for a single table is contained by
/// the reader instead of surfacing here.
#[derive(Error, Debug)]
pub enum SchemaPlanError {
    #[error(
        "conflicting definitions for column `{column}` of table `{table}`: \
         entity `{first_entity}` declares {first}, entity `{second_entity}` declares {second}"
    )]
    ColumnConflict {
        table: String,
        column: String,
        first_entity: String,
        first: String,
        second_entity: String,
        second: String,
    },

    #[error("{kind} name `{name}` on table `{table}` collides with a different definition")]
    NameCollision {
        /// "index" or "foreign key"
        kind: &'static str,
        table: String,
        name: String,
    },

    #[error("non-entity found in relation: `{entity}.{property}` targets `{target}`")]
    NonEntityRelation {
        entity: String,
        property: String,
        target: String,
    },

    #[error("unsupported database driver: {driver}")]
    UnsupportedDriver { driver: String },

    #[error("failed to enumerate tables: {message}")]
    Introspection { message: String },
}
