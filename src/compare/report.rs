//! Human-readable plan printer.

use super::types::{CompareOp, TableCompareResult};

fn op_marker(op: CompareOp) -> char {
    match op {
        CompareOp::Create => '+',
        CompareOp::Update => '~',
        CompareOp::Delete => '-',
    }
}

/// Print the plan to stdout, one table section per result.
pub fn print_plan(results: &[TableCompareResult]) {
    println!("=== Schema Plan ===");
    println!();
    if results.is_empty() {
        println!("No changes.");
        return;
    }
    for table in results {
        println!(
            "{} table {} ({})",
            op_marker(table.operation),
            table.name,
            table.operation
        );
        for column in &table.columns {
            let detail = match (&column.desired, &column.actual) {
                (Some(d), None) => {
                    let nullable = if d.nullable { " (nullable)" } else { "" };
                    format!("{}{}", d.column_type, nullable)
                }
                (None, Some(a)) => a.column_type.to_string(),
                (Some(d), Some(a)) => {
                    let mut mismatches = Vec::new();
                    if !column.type_matches {
                        mismatches.push(format!("type {} -> {}", a.column_type, d.column_type));
                    }
                    if !column.nullable_matches {
                        mismatches.push(format!(
                            "nullable {} -> {}",
                            a.nullable, d.nullable
                        ));
                    }
                    if !column.default_matches {
                        mismatches.push(format!(
                            "default {} -> {}",
                            a.default.as_deref().unwrap_or("(none)"),
                            d.default.as_deref().unwrap_or("(none)")
                        ));
                    }
                    if !column.length_matches {
                        mismatches.push(format!(
                            "length {} -> {}",
                            a.length.map_or("(none)".to_string(), |l| l.to_string()),
                            d.length.map_or("(none)".to_string(), |l| l.to_string())
                        ));
                    }
                    mismatches.join(", ")
                }
                (None, None) => String::new(),
            };
            println!(
                "  {} {}: {}",
                op_marker(column.operation),
                column.name,
                detail
            );
        }
        for index in &table.indexes {
            let unique = if index.unique { "UNIQUE " } else { "" };
            println!(
                "  {} {}INDEX {} ({})",
                op_marker(index.operation),
                unique,
                index.name,
                index.columns.join(", ")
            );
        }
        for fk in &table.foreign_keys {
            println!(
                "  {} FOREIGN KEY {} ({}) -> {}.{}",
                op_marker(fk.operation),
                fk.name,
                fk.column,
                fk.referenced_table,
                fk.referenced_column
            );
        }
        println!();
    }
}
