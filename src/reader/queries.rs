//! Driver-specific introspection statements.
//!
//! Each supported backend gets one set of catalog queries, all shaped to
//! return the same column aliases so the reader can parse rowsets
//! uniformly: `table_name`, `column_name`, `data_type`, `is_nullable`,
//! `column_default`, `index_name`, `is_unique`, `constraint_name`,
//! `referenced_table`, `referenced_column`.

use crate::error::SchemaPlanError;

/// The introspection statement set for one driver.
#[derive(Debug, Clone)]
pub struct IntrospectionQueries {
    /// No parameters; yields `table_name` rows.
    pub list_tables: &'static str,
    /// One parameter (table name); yields `column_name`, `data_type`,
    /// `is_nullable`, `column_default` in ordinal order.
    pub list_columns: &'static str,
    /// One parameter (table name); yields one row per (index, column):
    /// `index_name`, `column_name`, `is_unique`, ordered by index then
    /// column position.
    pub list_indexes: &'static str,
    /// One parameter (table name); yields one row per foreign key:
    /// `constraint_name` (may be NULL), `column_name`, `referenced_table`,
    /// `referenced_column`.
    pub list_foreign_keys: &'static str,
}

impl IntrospectionQueries {
    pub fn for_driver(driver: &str) -> Result<Self, SchemaPlanError> {
        match driver {
            "postgres" | "pgsql" => Ok(POSTGRES),
            "mysql" | "mariadb" => Ok(MYSQL),
            "sqlite" => Ok(SQLITE),
            other => Err(SchemaPlanError::UnsupportedDriver {
                driver: other.to_string(),
            }),
        }
    }
}

const POSTGRES: IntrospectionQueries = IntrospectionQueries {
    list_tables: "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' \
         ORDER BY table_name",
    // character_maximum_length is folded back into the raw type text so the
    // reader sees the same `base(length)` form every driver produces.
    list_columns: "SELECT column_name, \
                CASE WHEN character_maximum_length IS NOT NULL \
                     THEN data_type || '(' || character_maximum_length || ')' \
                     ELSE data_type END AS data_type, \
                is_nullable, column_default \
         FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = $1 \
         ORDER BY ordinal_position",
    list_indexes: "SELECT i.relname AS index_name, a.attname AS column_name, \
                ix.indisunique AS is_unique \
         FROM pg_class t \
         JOIN pg_index ix ON t.oid = ix.indrelid \
         JOIN pg_class i ON i.oid = ix.indexrelid \
         JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey) \
         WHERE t.relname = $1 AND NOT ix.indisprimary \
         ORDER BY i.relname, array_position(ix.indkey, a.attnum)",
    list_foreign_keys: "SELECT con.conname AS constraint_name, att.attname AS column_name, \
                ref.relname AS referenced_table, refatt.attname AS referenced_column \
         FROM pg_constraint con \
         JOIN pg_class t ON t.oid = con.conrelid \
         JOIN pg_class ref ON ref.oid = con.confrelid \
         JOIN pg_attribute att ON att.attrelid = con.conrelid \
              AND att.attnum = con.conkey[1] \
         JOIN pg_attribute refatt ON refatt.attrelid = con.confrelid \
              AND refatt.attnum = con.confkey[1] \
         WHERE con.contype = 'f' AND t.relname = $1 \
         ORDER BY con.conname",
};

const MYSQL: IntrospectionQueries = IntrospectionQueries {
    list_tables: "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
         ORDER BY table_name",
    // column_type keeps the parenthesized length, unlike data_type.
    list_columns: "SELECT column_name, column_type AS data_type, is_nullable, \
                column_default \
         FROM information_schema.columns \
         WHERE table_schema = DATABASE() AND table_name = ? \
         ORDER BY ordinal_position",
    list_indexes: "SELECT index_name, column_name, non_unique = 0 AS is_unique \
         FROM information_schema.statistics \
         WHERE table_schema = DATABASE() AND table_name = ? \
               AND index_name <> 'PRIMARY' \
         ORDER BY index_name, seq_in_index",
    list_foreign_keys: "SELECT constraint_name, column_name, \
                referenced_table_name AS referenced_table, \
                referenced_column_name AS referenced_column \
         FROM information_schema.key_column_usage \
         WHERE table_schema = DATABASE() AND table_name = ? \
               AND referenced_table_name IS NOT NULL \
         ORDER BY constraint_name",
};

const SQLITE: IntrospectionQueries = IntrospectionQueries {
    list_tables: "SELECT name AS table_name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         ORDER BY name",
    list_columns: "SELECT name AS column_name, type AS data_type, \
                CASE WHEN \"notnull\" = 0 THEN 'YES' ELSE 'NO' END AS is_nullable, \
                dflt_value AS column_default \
         FROM pragma_table_info(?1) ORDER BY cid",
    list_indexes: "SELECT il.name AS index_name, ii.name AS column_name, \
                il.\"unique\" AS is_unique \
         FROM pragma_index_list(?1) AS il, pragma_index_info(il.name) AS ii \
         WHERE il.origin <> 'pk' \
         ORDER BY il.seq, ii.seqno",
    // sqlite exposes no constraint names; the reader synthesizes them.
    list_foreign_keys: "SELECT NULL AS constraint_name, \"from\" AS column_name, \
                \"table\" AS referenced_table, \"to\" AS referenced_column \
         FROM pragma_foreign_key_list(?1) ORDER BY id, seq",
};
