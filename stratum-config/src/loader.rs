use std::{any::type_name, fs, path::Path};

use stratum_core::{
    config::ConnectorConfig,
    err::{Context, Result},
};
use stratum_logging::{debug, info};

use crate::validate::validate;

/// Parses, validates and loads the connector configuration
#[derive(Debug, Default)]
pub struct ConfigLoader {}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {}
    }

    /// Loads the connector configuration from the supplied file
    pub fn load(&self, path: &Path) -> Result<ConnectorConfig> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to get full config path {}", path.display()))?;
        info!("Loading config from path {}", path.display());

        let file_data = fs::read(&path).context(format!(
            "Failed to read config from file {}",
            path.display()
        ))?;

        let config = self.load_data(file_data.as_slice())?;
        info!(
            "Loaded config with {} tables and {} native queries",
            config.tables.len(),
            config.native_operations.len()
        );

        Ok(config)
    }

    /// Parses and validates the supplied json
    pub fn load_data(&self, data: &[u8]) -> Result<ConnectorConfig> {
        debug!("Parsing into {}", type_name::<ConnectorConfig>());
        let config: ConnectorConfig =
            serde_json::from_slice(data).context("Failed to parse json into ConnectorConfig")?;

        validate(&config).context("Invalid connector config")?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use stratum_core::config::ConnectionUri;

    use super::*;

    #[test]
    fn test_config_loader_minimal() {
        let config = ConfigLoader::new()
            .load_data(br#"{"connection_uri": {"value": "postgres://localhost/db"}}"#)
            .unwrap();

        assert_eq!(
            config.connection_uri,
            ConnectionUri::Value {
                value: "postgres://localhost/db".into()
            }
        );
        assert!(config.tables.is_empty());
    }

    #[test]
    fn test_config_loader_malformed_json() {
        let err = ConfigLoader::new()
            .load_data(br#"{"connection_uri": "#)
            .unwrap_err();

        assert!(err.to_string().contains("Failed to parse json"));
    }

    #[test]
    fn test_config_loader_invalid_config() {
        let err = ConfigLoader::new()
            .load_data(
                br#"{
                    "connection_uri": {"value": "x"},
                    "tables": [{"name": "t", "columns": []}]
                }"#,
            )
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid connector config");
    }

    #[test]
    fn test_config_loader_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "connection_uri": {"variable": "SNOWFLAKE_URI"},
                "tables": [
                    {"name": "PUBLIC.ORDERS", "columns": [{"name": "ID", "type": "NUMBER(38,0)"}]}
                ]
            }"#,
        )
        .unwrap();

        let config = ConfigLoader::new().load(file.path()).unwrap();

        assert_eq!(config.tables.len(), 1);
        assert_eq!(config.tables[0].alias(), "ORDERS");
    }

    #[test]
    fn test_config_loader_missing_file() {
        let err = ConfigLoader::new()
            .load(Path::new("/does/not/exist.json"))
            .unwrap_err();

        assert!(err.to_string().contains("Failed to get full config path"));
    }
}
