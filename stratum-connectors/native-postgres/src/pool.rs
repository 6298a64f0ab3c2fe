use std::{
    convert::TryFrom,
    ops::{Deref, DerefMut},
    time::Duration,
};

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use futures_util::future::try_join_all;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use stratum_connectors_base::interface::ConnectionPool;
use stratum_core::err::{Context, Result};
use stratum_logging::info;
use tokio_postgres::Config;

use crate::{runtime, PostgresConnection, PostgresConnectionConfig};

/// Postgres connection pool based on deadpool
#[derive(Clone)]
pub struct PostgresConnectionPool {
    pool: Pool,
}

impl PostgresConnectionPool {
    /// Creates the pool and opens its idle connections.
    ///
    /// Must not be called from within an async context.
    pub fn new(conf: PostgresConnectionConfig) -> Result<Self> {
        let timeout = conf.pool.connection_timeout();

        let pool = Pool::builder(Manager::from_config(
            Config::try_from(&conf)?,
            MakeTlsConnector::new(TlsConnector::new()?),
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        ))
        .runtime(deadpool_postgres::Runtime::Tokio1)
        .max_size(conf.pool.max_size() as _)
        .wait_timeout(Some(timeout))
        .create_timeout(Some(timeout))
        .build()
        .context("Failed to build postgres connection pool")?;

        let pool = Self { pool };
        pool.open_idle(conf.pool.min_idle(), conf.pool.init_timeout())?;

        Ok(pool)
    }

    /// Opens `count` connections up front so they idle in the pool
    fn open_idle(&self, count: u32, timeout: Duration) -> Result<()> {
        let pool = self.pool.clone();

        runtime()
            .block_on(async move {
                tokio::time::timeout(timeout, async {
                    // held together so each is a distinct connection
                    let clients = try_join_all((0..count).map(|_| pool.get())).await?;
                    Ok::<_, deadpool_postgres::PoolError>(clients.len())
                })
                .await
            })
            .context("Timed out opening initial postgres connections")?
            .context("Failed to open initial postgres connections")?;

        info!("Opened {} idle postgres connections", count);
        Ok(())
    }

    /// The current size of the pool
    pub fn size(&self) -> usize {
        self.pool.status().size
    }
}

impl ConnectionPool for PostgresConnectionPool {
    type TConnection = PostgresConnection<PooledClient>;

    fn acquire(&mut self) -> Result<Self::TConnection> {
        let con = runtime()
            .block_on(self.pool.get())
            .context("Failed to acquire postgres connection")?;

        Ok(PostgresConnection::new(PooledClient(con)))
    }
}

/// Adaptor for the deadpool client wrapper type to
/// deref into the underlying tokio_postgres::Client
pub struct PooledClient(deadpool_postgres::Client);

impl Deref for PooledClient {
    type Target = tokio_postgres::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PooledClient {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
