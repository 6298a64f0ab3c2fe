//! The Redshift connector.
//!
//! Redshift speaks the postgres wire protocol so connections are made
//! through the postgres pool.

mod dialect;
pub use dialect::*;
mod types;
pub use types::*;

pub use stratum_connectors_native_postgres::{
    PostgresConnectionConfig as RedshiftConnectionConfig,
    PostgresConnectionPool as RedshiftConnectionPool,
};
