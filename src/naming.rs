//! Deterministic identifier derivation.
//!
//! Every function here is a pure function of its inputs: the same columns
//! and table names always produce the same identifier, regardless of the
//! order entities are processed in. That symmetry matters for mapping
//! tables between two entities, where either side may be resolved first.

use sha2::{Digest, Sha256};

/// Most databases cap identifiers at or near 64 bytes (MySQL: 64,
/// PostgreSQL: 63). Generated names longer than this are hashed.
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Derive the foreign-key column name for a relation property:
/// lower-snake-case plus an `_id` suffix.
///
/// `authorUser` becomes `author_user_id`.
pub fn relation_column_name(property: &str) -> String {
    format!("{}_id", to_snake_case(property))
}

/// Deterministic foreign-key constraint name.
pub fn foreign_key_name(table: &str, referenced_table: &str, column: &str) -> String {
    format!("fk_{}_{}_{}", table, referenced_table, column)
}

/// Name of the join table for a many-to-many relation between two tables.
///
/// The inputs are snake-cased and sorted lexicographically before joining,
/// so `mapping_table_name(a, b) == mapping_table_name(b, a)`.
pub fn mapping_table_name(table_a: &str, table_b: &str) -> String {
    let mut names = [to_snake_case(table_a), to_snake_case(table_b)];
    names.sort();
    format!("{}_{}", names[0], names[1])
}

/// Resolve an index name.
///
/// An explicit name wins; otherwise the column names are joined with `_`
/// and suffixed `_idx`. Either way, a result longer than
/// [`MAX_IDENTIFIER_LENGTH`] is replaced with a fixed-length content hash
/// of the same string, keeping the name deterministic while respecting
/// identifier-length limits.
pub fn index_name<S: AsRef<str>>(columns: &[S], explicit_name: Option<&str>) -> String {
    let name = match explicit_name {
        Some(explicit) => explicit.to_string(),
        None => {
            let joined: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();
            format!("{}_idx", joined.join("_"))
        }
    };
    if name.len() > MAX_IDENTIFIER_LENGTH {
        hashed_identifier(&name)
    } else {
        name
    }
}

/// Fixed-length stand-in for an over-long identifier: `idx_` plus the first
/// 28 hex chars of the sha256 of the original name.
fn hashed_identifier(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    format!("idx_{}", &hex::encode(digest)[..28])
}

/// Convert an identifier (camelCase, PascalCase, or already snake) to
/// lower-snake-case.
pub fn to_snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower_or_digit = false;
    for ch in input.chars() {
        if ch.is_uppercase() {
            if prev_lower_or_digit {
                out.push('_');
            }
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_lower_or_digit = false;
        } else {
            if ch == '_' || ch == '-' || ch == ' ' {
                if !out.ends_with('_') {
                    out.push('_');
                }
                prev_lower_or_digit = false;
                continue;
            }
            out.push(ch);
            prev_lower_or_digit = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}
