//! SQL statement builders
//!
//! Identifiers come only from a [`TableSchema`], whose constructor accepts
//! plain identifiers; values are always bound as `?` parameters.

use crate::schema::TableSchema;

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

fn column_list(schema: &TableSchema) -> String {
    schema
        .field_names()
        .map(quote)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `INSERT INTO "t" ("a", "b") VALUES (?, ?)`
pub fn insert(schema: &TableSchema) -> String {
    let placeholders = vec!["?"; schema.field_count()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(schema.name()),
        column_list(schema),
        placeholders
    )
}

/// `CREATE TABLE IF NOT EXISTS "t" ("a" BIGINT NOT NULL, ...)`
pub fn create_table(schema: &TableSchema) -> String {
    let columns = schema
        .fields()
        .iter()
        .map(|f| format!("{} {} NOT NULL", quote(&f.name), f.field_type.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({})", quote(schema.name()), columns)
}

/// Every column cast to text, in insertion order
pub fn select_as_text(schema: &TableSchema) -> String {
    let columns = schema
        .field_names()
        .map(|name| format!("CAST({} AS VARCHAR)", quote(name)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {} FROM {} ORDER BY rowid", columns, quote(schema.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;

    fn jobs() -> TableSchema {
        TableSchema::new("jobs", vec![FieldDef::integer("id"), FieldDef::string("location")])
            .unwrap()
    }

    #[test]
    fn test_insert_statement() {
        assert_eq!(
            insert(&jobs()),
            r#"INSERT INTO "jobs" ("id", "location") VALUES (?, ?)"#
        );
    }

    #[test]
    fn test_create_table_statement() {
        assert_eq!(
            create_table(&jobs()),
            r#"CREATE TABLE IF NOT EXISTS "jobs" ("id" BIGINT NOT NULL, "location" VARCHAR NOT NULL)"#
        );
    }

    #[test]
    fn test_select_statement() {
        assert_eq!(
            select_as_text(&jobs()),
            r#"SELECT CAST("id" AS VARCHAR), CAST("location" AS VARCHAR) FROM "jobs" ORDER BY rowid"#
        );
    }
}
