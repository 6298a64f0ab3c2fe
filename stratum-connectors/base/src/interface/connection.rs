use stratum_core::{data::Row, err::Result};

/// A pool of connections to the warehouse.
///
/// Cloning the pool yields a handle to the same underlying pool so it can be
/// moved onto a blocking worker.
pub trait ConnectionPool: Clone + Send + Sync + 'static {
    type TConnection: Connection;

    /// Acquires a connection from the pool, waiting at most the configured
    /// connection timeout. The connection is returned to the pool when dropped.
    fn acquire(&mut self) -> Result<Self::TConnection>;
}

/// A live connection to the warehouse
pub trait Connection {
    /// Executes the supplied statement and materialises the returned rows
    fn execute(&mut self, sql: &str) -> Result<Vec<Row>>;
}
