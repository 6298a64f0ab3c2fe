use std::{convert::TryFrom, str::FromStr};

use stratum_core::{
    config::{ConnectorConfig, PoolConfig},
    err::{Context, Error, Result},
};
use tokio_postgres::Config;

/// The connection config
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresConnectionConfig {
    /// Either a `postgres://` url or key/value options, eg
    /// host=localhost user=postgres connect_timeout=10 keepalives=0
    /// @see https://docs.rs/postgres/latest/postgres/config/struct.Config.html
    pub uri: String,
    /// Connection pool config
    pub pool: PoolConfig,
}

impl PostgresConnectionConfig {
    pub fn new(uri: impl Into<String>, pool: PoolConfig) -> Self {
        Self {
            uri: uri.into(),
            pool,
        }
    }

    /// Resolves the connection uri of the connector config
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        Ok(Self::new(
            config.connection_uri.resolve()?,
            config.pool.clone(),
        ))
    }
}

// The uri may carry credentials
impl std::fmt::Debug for PostgresConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConnectionConfig")
            .field("uri", &"<redacted>")
            .field("pool", &self.pool)
            .finish()
    }
}

impl TryFrom<&PostgresConnectionConfig> for Config {
    type Error = Error;

    fn try_from(conf: &PostgresConnectionConfig) -> Result<Self, Self::Error> {
        Config::from_str(&conf.uri).context("Failed to parse postgres connection uri")
    }
}
