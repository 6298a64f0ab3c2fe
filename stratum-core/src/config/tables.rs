use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A table (or view) of the warehouse exposed as a collection
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    /// The collection name, optionally qualified as `schema.table`
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: TableCategory,
    #[serde(default)]
    pub description: Option<String>,
    pub columns: Vec<ColumnInfo>,
    #[serde(default)]
    pub primary_keys: Vec<String>,
    #[serde(default)]
    pub foreign_keys: IndexMap<String, ForeignKeyInfo>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableCategory {
    #[default]
    Table,
    View,
    MaterializedView,
}

/// A column of a table
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// The vendor type text, eg `NUMBER(38,0)` or `ARRAY<STRUCT<a INT64>>`
    pub r#type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub is_primarykey: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    /// Local column name -> foreign column name
    pub column_mapping: IndexMap<String, String>,
    pub foreign_collection: String,
}

fn default_nullable() -> bool {
    true
}

impl TableInfo {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The segments of the qualified table name
    pub fn name_parts(&self) -> Vec<&str> {
        self.name.split('.').collect()
    }

    /// The unqualified table name, used as the alias within a query
    pub fn alias(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, r#type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
            nullable,
            description: None,
            auto_increment: false,
            is_primarykey: false,
        }
    }
}
