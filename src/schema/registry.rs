//! Schema registry
//!
//! The registry is built once at startup, either from the built-in table
//! set or from a JSON file, and is read-only afterwards. Components share it
//! through an `Arc`; there is no runtime registration.
//!
//! File format:
//!
//! ```json
//! {"tables": [{"name": "jobs", "fields": [{"name": "id", "type": "integer"}]}]}
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDef, TableSchema};

/// On-disk representation of one table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableFile {
    name: String,
    fields: Vec<FieldDef>,
}

/// On-disk representation of a registry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryFile {
    tables: Vec<TableFile>,
}

/// Immutable mapping from table name to schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: BTreeMap<String, TableSchema>,
}

impl SchemaRegistry {
    /// Builds a registry from table schemas, rejecting duplicate names.
    pub fn from_tables(tables: Vec<TableSchema>) -> SchemaResult<Self> {
        let mut map = BTreeMap::new();
        for table in tables {
            let name = table.name().to_string();
            if map.insert(name.clone(), table).is_some() {
                return Err(SchemaError::InvalidDefinition(format!(
                    "table '{}' declared twice",
                    name
                )));
            }
        }
        Ok(Self { tables: map })
    }

    /// The built-in table set.
    pub fn builtin() -> SchemaResult<Self> {
        Self::from_tables(vec![
            TableSchema::new(
                "hired_employees",
                vec![
                    FieldDef::integer("id"),
                    FieldDef::string("name"),
                    FieldDef::string("datetime"),
                    FieldDef::integer("department_id"),
                    FieldDef::integer("job_id"),
                ],
            )?,
            TableSchema::new(
                "departments",
                vec![FieldDef::integer("id"), FieldDef::integer("user_id")],
            )?,
            TableSchema::new(
                "jobs",
                vec![FieldDef::integer("id"), FieldDef::string("location")],
            )?,
        ])
    }

    /// Parses a registry from its JSON representation.
    pub fn from_json(content: &str) -> SchemaResult<Self> {
        let file: RegistryFile = serde_json::from_str(content)
            .map_err(|e| SchemaError::InvalidDefinition(format!("invalid JSON: {}", e)))?;

        let tables = file
            .tables
            .into_iter()
            .map(|t| TableSchema::new(t.name, t.fields))
            .collect::<SchemaResult<Vec<_>>>()?;

        Self::from_tables(tables)
    }

    /// Loads a registry file from disk.
    pub fn load_file(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_json(&content).map_err(|e| SchemaError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Looks up a table by exact, case-sensitive name.
    pub fn lookup(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Like [`lookup`](Self::lookup) but fails with `UnknownTable`.
    pub fn require(&self, name: &str) -> SchemaResult<&TableSchema> {
        self.lookup(name)
            .ok_or_else(|| SchemaError::UnknownTable(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Registered table names, sorted
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// All tables, sorted by name
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
