use std::env;

use serde::{Deserialize, Serialize};

use crate::err::{Context, Result};

/// The connection string of the warehouse, either inline or read from
/// an environment variable when the connector starts.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConnectionUri {
    Value { value: String },
    Variable { variable: String },
}

impl ConnectionUri {
    /// Resolves the connection string.
    ///
    /// Fails when the referenced environment variable is not set.
    pub fn resolve(&self) -> Result<String> {
        match self {
            ConnectionUri::Value { value } => Ok(value.clone()),
            ConnectionUri::Variable { variable } => env::var(variable).with_context(|| {
                format!("Failed to resolve connection uri: environment variable \"{variable}\" is not set")
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_resolve_value() {
        let uri = ConnectionUri::Value {
            value: "jdbc:snowflake://acme".into(),
        };

        assert_eq!(uri.resolve().unwrap(), "jdbc:snowflake://acme");
    }

    #[test]
    #[serial]
    fn test_resolve_variable() {
        env::set_var("STRATUM_TEST_CONNECTION_URI", "postgres://db");
        let uri = ConnectionUri::Variable {
            variable: "STRATUM_TEST_CONNECTION_URI".into(),
        };

        assert_eq!(uri.resolve().unwrap(), "postgres://db");
        env::remove_var("STRATUM_TEST_CONNECTION_URI");
    }

    #[test]
    #[serial]
    fn test_resolve_missing_variable() {
        env::remove_var("STRATUM_TEST_MISSING_URI");
        let uri = ConnectionUri::Variable {
            variable: "STRATUM_TEST_MISSING_URI".into(),
        };

        let err = uri.resolve().unwrap_err();
        assert!(err.to_string().contains("STRATUM_TEST_MISSING_URI"));
    }

    #[test]
    fn test_deserialize_untagged() {
        let value: ConnectionUri = serde_json::from_str(r#"{"value": "x"}"#).unwrap();
        let variable: ConnectionUri = serde_json::from_str(r#"{"variable": "Y"}"#).unwrap();

        assert_eq!(value, ConnectionUri::Value { value: "x".into() });
        assert_eq!(variable, ConnectionUri::Variable { variable: "Y".into() });
    }
}
