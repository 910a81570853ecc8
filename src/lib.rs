//! schema-planner: reconcile declarative entity metadata against a live
//! database schema.
//!
//! Entity projections (produced by an external metadata resolver) describe
//! the *desired* schema; the [`reader::SchemaReader`] introspects the
//! *actual* schema through a [`reader::Connection`]; the comparator turns
//! the pair into an ordered set of [`compare::TableCompareResult`] entries
//! for an external DDL generator to execute. The comparison is a pure,
//! single-threaded function of its inputs: no DDL is run here, no migration
//! history is kept, and repeated runs against a matching database yield an
//! empty plan.

pub mod compare;
pub mod error;
pub mod naming;
pub mod reader;
pub mod schema;

use anyhow::Result;

pub use error::SchemaPlanError;

/// Options for building a schema plan.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Propose dropping actual tables no entity maps to (default: keep
    /// unrecognized tables untouched).
    pub include_drops: bool,
    /// Enable verbose output
    pub verbose: bool,
}

/// Build a schema plan from entity projections and a live connection.
pub fn plan_schema<C: reader::Connection>(
    projections: &[schema::EntityProjection],
    conn: &mut C,
    options: &PlanOptions,
) -> Result<Vec<compare::TableCompareResult>> {
    if options.verbose {
        println!("Merging {} entity projections", projections.len());
    }

    // Step 1: Fold projections into one desired table per table name
    let desired = schema::merge_projections(projections)?;

    if options.verbose {
        println!("Desired schema spans {} tables", desired.len());
    }

    // Step 2: Diff against the actual schema
    let mut reader = reader::SchemaReader::new(conn)?;
    let compare_options = compare::CompareOptions {
        include_drops: options.include_drops,
    };
    let results = compare::compare(&desired, &mut reader, &compare_options)?;

    if options.verbose {
        println!("Plan contains {} table entries", results.len());
    }

    Ok(results)
}
