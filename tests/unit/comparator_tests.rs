//! Unit tests for the schema comparator

use pretty_assertions::assert_eq;

use schema_planner::compare::{compare, CompareOp, CompareOptions};
use schema_planner::reader::SchemaReader;
use schema_planner::schema::{merge_projections, ForeignKeyDef, IndexDef};

use crate::common::{
    column_row, desired_column, desired_string, fk_row, index_row, projection_with_id,
    FakeConnection, FakeTable,
};
use schema_planner::schema::ColumnType;

fn run_compare(
    projections: Vec<schema_planner::schema::EntityProjection>,
    conn: &mut FakeConnection,
    options: CompareOptions,
) -> Vec<schema_planner::compare::TableCompareResult> {
    let desired = merge_projections(&projections).unwrap();
    let mut reader = SchemaReader::new(conn).unwrap();
    compare(&desired, &mut reader, &options).unwrap()
}

// ============================================================================
// Table-level operations
// ============================================================================

#[test]
fn test_absent_desired_table_becomes_create_with_create_children() {
    let mut projection =
        projection_with_id("Order", "orders", vec![desired_string("number", 32)]);
    projection.indexes.push(IndexDef::on(["number"]).unique());
    projection
        .foreign_keys
        .push(ForeignKeyDef::new("customer_id", "customers"));

    let mut conn = FakeConnection::new(vec![]);
    let results = run_compare(vec![projection], &mut conn, CompareOptions::default());

    assert_eq!(results.len(), 1);
    let table = &results[0];
    assert_eq!(table.name, "orders");
    assert_eq!(table.operation, CompareOp::Create);
    assert_eq!(table.columns.len(), 2);
    assert!(table.columns.iter().all(|c| c.operation == CompareOp::Create));
    assert!(table.indexes.iter().all(|i| i.operation == CompareOp::Create));
    assert!(table
        .foreign_keys
        .iter()
        .all(|f| f.operation == CompareOp::Create));
    assert_eq!(table.primary_key_columns, vec!["id"]);
}

#[test]
fn test_matching_schema_yields_empty_plan() {
    let mut users = FakeTable::new("users");
    users.columns.push(column_row("id", "int", false, None));
    users
        .columns
        .push(column_row("email", "varchar(255)", false, None));
    let mut conn = FakeConnection::new(vec![users]);

    let projection = projection_with_id("User", "users", vec![desired_string("email", 255)]);
    let results = run_compare(vec![projection], &mut conn, CompareOptions::default());
    assert!(results.is_empty(), "idempotent comparison must be a no-op");
}

#[test]
fn test_unrecognized_actual_table_dropped_only_on_opt_in() {
    let mut conn = FakeConnection::new(vec![FakeTable::new("legacy_stuff")]);
    let results = run_compare(vec![], &mut conn, CompareOptions::default());
    assert!(results.is_empty());

    let mut conn = FakeConnection::new(vec![FakeTable::new("legacy_stuff")]);
    let results = run_compare(vec![], &mut conn, CompareOptions { include_drops: true });
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "legacy_stuff");
    assert_eq!(results[0].operation, CompareOp::Delete);
}

#[test]
fn test_present_but_empty_table_is_update_not_create() {
    // Existence comes from the table listing, not from column emptiness:
    // a table whose column query returns nothing still diffs as an update.
    let mut conn = FakeConnection::new(vec![FakeTable::new("users")]);
    conn.failing_tables.push("users".to_string());

    let projection = projection_with_id("User", "users", vec![]);
    let results = run_compare(vec![projection], &mut conn, CompareOptions::default());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].operation, CompareOp::Update);
    assert!(results[0]
        .columns
        .iter()
        .all(|c| c.operation == CompareOp::Create));
}

// ============================================================================
// Column diff
// ============================================================================

#[test]
fn test_nullable_mismatch_flags_only_nullable() {
    let mut users = FakeTable::new("users");
    users.columns.push(column_row("id", "int", false, None));
    users
        .columns
        .push(column_row("email", "varchar(255)", true, None));
    let mut conn = FakeConnection::new(vec![users]);

    let projection = projection_with_id("User", "users", vec![desired_string("email", 255)]);
    let results = run_compare(vec![projection], &mut conn, CompareOptions::default());

    assert_eq!(results.len(), 1);
    let table = &results[0];
    assert_eq!(table.operation, CompareOp::Update);
    assert_eq!(table.columns.len(), 1);
    let column = &table.columns[0];
    assert_eq!(column.name, "email");
    assert_eq!(column.operation, CompareOp::Update);
    assert!(column.type_matches);
    assert!(!column.nullable_matches);
    assert!(column.default_matches);
    assert!(column.length_matches);
}

#[test]
fn test_null_default_distinct_from_empty_string() {
    let mut users = FakeTable::new("users");
    users.columns.push(column_row("id", "int", false, None));
    users
        .columns
        .push(column_row("status", "varchar(20)", false, Some("")));
    let mut conn = FakeConnection::new(vec![users]);

    // Desired default is NULL; actual is the empty string.
    let projection = projection_with_id("User", "users", vec![desired_string("status", 20)]);
    let results = run_compare(vec![projection], &mut conn, CompareOptions::default());

    let column = &results[0].columns[0];
    assert!(!column.default_matches);
    assert!(column.type_matches && column.nullable_matches && column.length_matches);
}

#[test]
fn test_desired_only_and_actual_only_columns() {
    let mut users = FakeTable::new("users");
    users.columns.push(column_row("id", "int", false, None));
    users
        .columns
        .push(column_row("obsolete", "int", true, None));
    let mut conn = FakeConnection::new(vec![users]);

    let projection = projection_with_id(
        "User",
        "users",
        vec![desired_column("age", ColumnType::Int)],
    );
    let results = run_compare(vec![projection], &mut conn, CompareOptions::default());

    let table = &results[0];
    assert_eq!(table.columns.len(), 2);
    let create = table.columns.iter().find(|c| c.name == "age").unwrap();
    assert_eq!(create.operation, CompareOp::Create);
    assert!(create.actual.is_none());
    let delete = table.columns.iter().find(|c| c.name == "obsolete").unwrap();
    assert_eq!(delete.operation, CompareOp::Delete);
    assert!(delete.desired.is_none());
}

// ============================================================================
// Index diff
// ============================================================================

#[test]
fn test_index_mismatch_is_delete_then_create() {
    let mut users = FakeTable::new("users");
    users.columns.push(column_row("id", "int", false, None));
    users
        .columns
        .push(column_row("email", "varchar(255)", false, None));
    // Actual index is non-unique; desired is unique.
    users.indexes.push(index_row("email_idx", "email", false));
    let mut conn = FakeConnection::new(vec![users]);

    let mut projection =
        projection_with_id("User", "users", vec![desired_string("email", 255)]);
    projection.indexes.push(IndexDef::on(["email"]).unique());

    let results = run_compare(vec![projection], &mut conn, CompareOptions::default());
    let table = &results[0];
    assert!(table.columns.is_empty());
    assert_eq!(table.indexes.len(), 2);
    assert_eq!(table.indexes[0].operation, CompareOp::Delete);
    assert_eq!(table.indexes[1].operation, CompareOp::Create);
    assert_eq!(table.indexes[0].name, table.indexes[1].name);
    assert!(table.indexes[1].unique);
}

#[test]
fn test_matching_index_emits_nothing() {
    let mut users = FakeTable::new("users");
    users.columns.push(column_row("id", "int", false, None));
    users
        .columns
        .push(column_row("email", "varchar(255)", false, None));
    users.indexes.push(index_row("email_idx", "email", true));
    let mut conn = FakeConnection::new(vec![users]);

    let mut projection =
        projection_with_id("User", "users", vec![desired_string("email", 255)]);
    projection.indexes.push(IndexDef::on(["email"]).unique());

    let results = run_compare(vec![projection], &mut conn, CompareOptions::default());
    assert!(results.is_empty());
}

// ============================================================================
// Foreign-key diff
// ============================================================================

#[test]
fn test_foreign_key_retarget_is_delete_then_create() {
    let mut posts = FakeTable::new("posts");
    posts.columns.push(column_row("id", "int", false, None));
    posts
        .columns
        .push(column_row("author_id", "int", false, None));
    posts.foreign_keys.push(fk_row(
        "fk_posts_users_author_id",
        "author_id",
        "users",
        "legacy_id",
    ));
    let mut conn = FakeConnection::new(vec![posts]);

    let mut projection = projection_with_id(
        "Post",
        "posts",
        vec![desired_column("author_id", ColumnType::Int)],
    );
    projection
        .foreign_keys
        .push(ForeignKeyDef::new("author_id", "users"));

    let results = run_compare(vec![projection], &mut conn, CompareOptions::default());
    let table = &results[0];
    assert_eq!(table.foreign_keys.len(), 2);
    assert_eq!(table.foreign_keys[0].operation, CompareOp::Delete);
    assert_eq!(table.foreign_keys[0].referenced_column, "legacy_id");
    assert_eq!(table.foreign_keys[1].operation, CompareOp::Create);
    assert_eq!(table.foreign_keys[1].referenced_column, "id");
}
