use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_MAX_SIZE: u32 = 10;
const DEFAULT_MIN_IDLE: u32 = 1;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INIT_TIMEOUT_SECS: u64 = 60;

/// The connection pool config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PoolConfig {
    /// Max pool size
    pub max_size: Option<u32>,
    /// Connections opened when the pool is created
    pub min_idle: Option<u32>,
    /// How long to wait when acquiring a connection
    pub connection_timeout_secs: Option<u64>,
    /// How long to wait for the pool to open its initial connections
    pub init_timeout_secs: Option<u64>,
}

impl PoolConfig {
    pub fn max_size(&self) -> u32 {
        self.max_size.unwrap_or(DEFAULT_MAX_SIZE)
    }

    pub fn min_idle(&self) -> u32 {
        self.min_idle
            .unwrap_or(DEFAULT_MIN_IDLE)
            .min(self.max_size())
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connection_timeout_secs
                .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_SECS),
        )
    }

    pub fn init_timeout(&self) -> Duration {
        Duration::from_secs(self.init_timeout_secs.unwrap_or(DEFAULT_INIT_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_defaults() {
        let conf = PoolConfig::default();

        assert_eq!(conf.max_size(), 10);
        assert_eq!(conf.min_idle(), 1);
        assert_eq!(conf.connection_timeout(), Duration::from_secs(30));
        assert_eq!(conf.init_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_min_idle_capped_by_max_size() {
        let conf = PoolConfig {
            max_size: Some(2),
            min_idle: Some(5),
            ..Default::default()
        };

        assert_eq!(conf.min_idle(), 2);
    }
}
