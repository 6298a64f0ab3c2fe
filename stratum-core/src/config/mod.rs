use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod connection;
pub use connection::*;
mod native;
pub use native::*;
mod pool;
pub use pool::*;
mod tables;
pub use tables::*;

/// The configuration document of a connector.
///
/// Loaded once at startup, immutable thereafter.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Where to connect to
    pub connection_uri: ConnectionUri,
    /// The schemas which were introspected
    #[serde(default)]
    pub schemas: Vec<String>,
    /// The table catalog
    #[serde(default)]
    pub tables: Vec<TableInfo>,
    /// Function definitions, exported verbatim in the schema
    #[serde(default)]
    pub functions: Vec<serde_json::Value>,
    /// Named SQL statements exposed as collections
    #[serde(default)]
    pub native_operations: IndexMap<String, NativeQueryInfo>,
    /// Connection pool options
    #[serde(default)]
    pub pool: PoolConfig,
}

impl ConnectorConfig {
    /// Creates a config with an empty catalog
    pub fn new(connection_uri: ConnectionUri) -> Self {
        Self {
            connection_uri,
            schemas: vec![],
            tables: vec![],
            functions: vec![],
            native_operations: IndexMap::new(),
            pool: PoolConfig::default(),
        }
    }

    /// Finds the table backing the supplied collection name
    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Finds the native query backing the supplied collection name
    pub fn native_query(&self, name: &str) -> Option<&NativeQueryInfo> {
        self.native_operations.get(name)
    }
}
