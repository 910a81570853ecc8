//! Unit tests for the naming resolver

use pretty_assertions::assert_eq;

use schema_planner::naming::{
    foreign_key_name, index_name, mapping_table_name, relation_column_name, to_snake_case,
    MAX_IDENTIFIER_LENGTH,
};

// ============================================================================
// Snake-casing and relation columns
// ============================================================================

#[test]
fn test_snake_case_camel_and_pascal() {
    assert_eq!(to_snake_case("authorUser"), "author_user");
    assert_eq!(to_snake_case("AuthorUser"), "author_user");
    assert_eq!(to_snake_case("already_snake"), "already_snake");
}

#[test]
fn test_relation_column_name_appends_id() {
    assert_eq!(relation_column_name("author"), "author_id");
    assert_eq!(relation_column_name("parentCategory"), "parent_category_id");
}

#[test]
fn test_foreign_key_name_is_composite() {
    assert_eq!(
        foreign_key_name("posts", "users", "author_id"),
        "fk_posts_users_author_id"
    );
}

// ============================================================================
// Mapping-table symmetry
// ============================================================================

#[test]
fn test_mapping_table_name_is_symmetric() {
    assert_eq!(
        mapping_table_name("users", "roles"),
        mapping_table_name("roles", "users")
    );
    assert_eq!(mapping_table_name("users", "roles"), "roles_users");
}

#[test]
fn test_mapping_table_name_snake_cases_inputs() {
    assert_eq!(
        mapping_table_name("BlogPosts", "TagItems"),
        "blog_posts_tag_items"
    );
}

// ============================================================================
// Index names and the length guard
// ============================================================================

#[test]
fn test_index_name_joins_columns() {
    assert_eq!(index_name(&["email"], None), "email_idx");
    assert_eq!(
        index_name(&["tenant_id", "email"], None),
        "tenant_id_email_idx"
    );
}

#[test]
fn test_index_name_prefers_explicit_name() {
    assert_eq!(
        index_name(&["tenant_id", "email"], Some("users_lookup")),
        "users_lookup"
    );
}

#[test]
fn test_index_name_over_limit_is_hashed_and_fixed_length() {
    let columns: Vec<String> = (0..10).map(|i| format!("very_long_column_name_{}", i)).collect();
    let name = index_name(&columns, None);
    assert!(name.len() <= MAX_IDENTIFIER_LENGTH);
    assert!(name.starts_with("idx_"));

    // Deterministic: same input, same hash.
    assert_eq!(name, index_name(&columns, None));
}

#[test]
fn test_index_name_distinct_inputs_distinct_hashes() {
    let a: Vec<String> = (0..10).map(|i| format!("left_column_padding_{}", i)).collect();
    let b: Vec<String> = (0..10).map(|i| format!("right_column_padding_{}", i)).collect();
    let name_a = index_name(&a, None);
    let name_b = index_name(&b, None);
    assert_eq!(name_a.len(), name_b.len());
    assert_ne!(name_a, name_b);
}
