//! Table schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 text, accepted verbatim
//! - integer: 64-bit signed integer, base 10
//!
//! New types are added as enum variants together with their coercion
//! routine in [`FieldType::coerce`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// Maximum number of rows accepted in one batch.
pub const MAX_BATCH_ROWS: usize = 1000;

static IDENTIFIER: OnceLock<Regex> = OnceLock::new();

/// Returns true if `name` is safe to interpolate as a SQL identifier.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
        })
        .is_match(name)
}

/// Field types understood by the row validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Integer,
}

impl FieldType {
    /// Returns the type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
        }
    }

    /// Returns the SQL column type used when bootstrapping the store
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldType::String => "VARCHAR",
            FieldType::Integer => "BIGINT",
        }
    }

    /// Coerces a raw token into a typed value, or `None` if the token
    /// does not belong to this type.
    pub fn coerce(&self, token: &str) -> Option<Value> {
        match self {
            FieldType::String => Some(Value::Text(token.to_string())),
            FieldType::Integer => token
                .trim_matches(|c: char| c.is_ascii_whitespace())
                .parse::<i64>()
                .ok()
                .map(Value::Integer),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
}

impl Value {
    /// Text rendering used when a value is widened to string
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
        }
    }
}

/// One column of a table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }
}

/// Ordered, typed field definition for one table.
///
/// Construction checks that the table and every field name are plain SQL
/// identifiers and that field names are unique, so the names can later be
/// quoted into statements without further escaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    name: String,
    fields: Vec<FieldDef>,
}

impl TableSchema {
    /// Creates a table schema, rejecting malformed definitions.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> SchemaResult<Self> {
        let name = name.into();

        if !is_identifier(&name) {
            return Err(SchemaError::InvalidDefinition(format!(
                "table name '{}' is not a valid identifier",
                name
            )));
        }
        if fields.is_empty() {
            return Err(SchemaError::InvalidDefinition(format!(
                "table '{}' declares no fields",
                name
            )));
        }

        for (i, field) in fields.iter().enumerate() {
            if !is_identifier(&field.name) {
                return Err(SchemaError::InvalidDefinition(format!(
                    "field '{}' of table '{}' is not a valid identifier",
                    field.name, name
                )));
            }
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::InvalidDefinition(format!(
                    "field '{}' declared twice in table '{}'",
                    field.name, name
                )));
            }
        }

        Ok(Self { name, fields })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// A row that passed validation: one typed value per schema field, in
/// schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    values: Vec<(String, Value)>,
}

impl ValidatedRow {
    pub(crate) fn new(values: Vec<(String, Value)>) -> Self {
        Self { values }
    }

    /// Looks up a value by field name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validated rows for exactly one table, holding between 1 and
/// [`MAX_BATCH_ROWS`] rows.
#[derive(Debug, Clone)]
pub struct ValidatedBatch {
    table: String,
    rows: Vec<ValidatedRow>,
}

impl ValidatedBatch {
    /// Wraps validated rows, enforcing the batch size bound.
    pub fn new(schema: &TableSchema, rows: Vec<ValidatedRow>) -> SchemaResult<Self> {
        if rows.is_empty() || rows.len() > MAX_BATCH_ROWS {
            return Err(SchemaError::BatchSize { actual: rows.len() });
        }
        Ok(Self {
            table: schema.name().to_string(),
            rows,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn rows(&self) -> &[ValidatedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; kept for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
