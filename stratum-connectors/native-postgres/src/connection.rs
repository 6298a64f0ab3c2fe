use std::ops::Deref;

use stratum_connectors_base::interface::Connection;
use stratum_core::{
    data::Row,
    err::{Context, Result},
};
use stratum_logging::{debug, MaxLogLength, MAX_SQL_LOG_LENGTH};
use tokio_postgres::Client;

use crate::{from_pg_row, runtime};

/// Connection to a postgres database
pub struct PostgresConnection<T> {
    /// The connection client
    client: T,
}

impl<T> PostgresConnection<T> {
    pub fn new(client: T) -> Self {
        Self { client }
    }
}

impl<T: Deref<Target = Client>> Connection for PostgresConnection<T> {
    fn execute(&mut self, sql: &str) -> Result<Vec<Row>> {
        debug!(
            "Executing postgres query: {}",
            MaxLogLength::new(Some(MAX_SQL_LOG_LENGTH), sql)
        );

        let rows = runtime()
            .block_on(self.client.query(sql, &[]))
            .context("Failed to execute postgres query")?;

        rows.iter().map(from_pg_row).collect()
    }
}
