//! Desired-schema model: descriptors produced by the metadata resolver and
//! the shared-table merge that folds them into one table map.

mod descriptors;
mod merge;

pub use descriptors::{
    validate_relation_target, ColumnDescriptor, ColumnType, EntityProjection, ForeignKeyDef,
    GeneratorKind, IndexDef, SoftDelete,
};
pub use merge::{merge_projections, DesiredForeignKey, DesiredIndex, DesiredTable};
