use serde_json::Value;
use stratum_connectors_athena::{AthenaColumnType, AthenaDialect};
use stratum_connectors_base::{
    common::{ConnectorState, SchemaBuilder},
    compiler::{CompiledQuery, QueryPlanner},
    interface::Dialect,
};
use stratum_connectors_bigquery::{BigQueryColumnType, BigQueryDialect};
use stratum_connectors_databricks::{DatabricksColumnType, DatabricksDialect};
use stratum_connectors_native_postgres::{
    PostgresColumnType, PostgresConnectionConfig, PostgresConnectionPool, PostgresDialect,
};
use stratum_connectors_phoenix::{PhoenixColumnType, PhoenixDialect};
use stratum_connectors_redshift::{RedshiftColumnType, RedshiftConnectionConfig, RedshiftDialect};
use stratum_connectors_snowflake::{SnowflakeColumnType, SnowflakeDialect};
use stratum_core::{
    config::ConnectorConfig,
    err::{Context, Result},
    not_supported,
    proto::{ExplainResponse, QueryRequest, QueryResponse, ResponseRow, SchemaResponse},
};
use stratum_logging::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialects {
    Snowflake,
    BigQuery,
    Redshift,
    Databricks,
    Athena,
    Phoenix,
    Postgres,
}

#[derive(Clone)]
pub enum ConnectionPools {
    NativePostgres(PostgresConnectionPool),
}

/// A running connector of a dialect which can be executed against
#[derive(Clone)]
pub enum Connectors {
    Postgres(ConnectorState<PostgresDialect, PostgresConnectionPool>),
    Redshift(ConnectorState<RedshiftDialect, PostgresConnectionPool>),
}

impl Dialects {
    pub const ALL: [Dialects; 7] = [
        Dialects::Snowflake,
        Dialects::BigQuery,
        Dialects::Redshift,
        Dialects::Databricks,
        Dialects::Athena,
        Dialects::Phoenix,
        Dialects::Postgres,
    ];

    pub fn from_type(r#type: &str) -> Option<Self> {
        Some(match r#type {
            SnowflakeDialect::TYPE => Dialects::Snowflake,
            BigQueryDialect::TYPE => Dialects::BigQuery,
            RedshiftDialect::TYPE => Dialects::Redshift,
            DatabricksDialect::TYPE => Dialects::Databricks,
            AthenaDialect::TYPE => Dialects::Athena,
            PhoenixDialect::TYPE => Dialects::Phoenix,
            PostgresDialect::TYPE => Dialects::Postgres,
            _ => return None,
        })
    }

    pub fn r#type(&self) -> &'static str {
        match self {
            Dialects::Snowflake => SnowflakeDialect::TYPE,
            Dialects::BigQuery => BigQueryDialect::TYPE,
            Dialects::Redshift => RedshiftDialect::TYPE,
            Dialects::Databricks => DatabricksDialect::TYPE,
            Dialects::Athena => AthenaDialect::TYPE,
            Dialects::Phoenix => PhoenixDialect::TYPE,
            Dialects::Postgres => PostgresDialect::TYPE,
        }
    }

    /// Compiles the request into the dialect's SQL without connecting
    pub fn compile(
        &self,
        config: &ConnectorConfig,
        request: &QueryRequest,
    ) -> Result<CompiledQuery> {
        match self {
            Dialects::Snowflake => QueryPlanner::<SnowflakeDialect>::compile(config, request),
            Dialects::BigQuery => QueryPlanner::<BigQueryDialect>::compile(config, request),
            Dialects::Redshift => QueryPlanner::<RedshiftDialect>::compile(config, request),
            Dialects::Databricks => QueryPlanner::<DatabricksDialect>::compile(config, request),
            Dialects::Athena => QueryPlanner::<AthenaDialect>::compile(config, request),
            Dialects::Phoenix => QueryPlanner::<PhoenixDialect>::compile(config, request),
            Dialects::Postgres => QueryPlanner::<PostgresDialect>::compile(config, request),
        }
    }

    /// Validates the request, plans are not explained
    pub fn explain(
        &self,
        config: &ConnectorConfig,
        request: &QueryRequest,
    ) -> Result<ExplainResponse> {
        self.compile(config, request)?;

        Ok(ExplainResponse::placeholder())
    }

    pub fn schema(&self, config: &ConnectorConfig) -> Result<SchemaResponse> {
        match self {
            Dialects::Snowflake => SchemaBuilder::<SnowflakeColumnType>::build(config),
            Dialects::BigQuery => SchemaBuilder::<BigQueryColumnType>::build(config),
            Dialects::Redshift => SchemaBuilder::<RedshiftColumnType>::build(config),
            Dialects::Databricks => SchemaBuilder::<DatabricksColumnType>::build(config),
            Dialects::Athena => SchemaBuilder::<AthenaColumnType>::build(config),
            Dialects::Phoenix => SchemaBuilder::<PhoenixColumnType>::build(config),
            Dialects::Postgres => SchemaBuilder::<PostgresColumnType>::build(config),
        }
    }

    /// Creates the connection pool of the dialect.
    ///
    /// Blocks until the idle connections are open, so must not be called from
    /// within an async context.
    pub fn create_connection_pool(&self, config: &ConnectorConfig) -> Result<ConnectionPools> {
        let pool = match self {
            Dialects::Postgres => PostgresConnectionPool::new(
                PostgresConnectionConfig::from_config(config)?,
            ),
            Dialects::Redshift => PostgresConnectionPool::new(
                RedshiftConnectionConfig::from_config(config)?,
            ),
            _ => not_supported!("executing queries on {}", self.r#type()),
        }
        .with_context(|| format!("Failed to create {} connection pool", self.r#type()))?;

        info!("Created {} connection pool", self.r#type());
        Ok(ConnectionPools::NativePostgres(pool))
    }
}

impl Connectors {
    /// Creates the connector of the dialect, connecting to the warehouse
    pub fn new(dialect: Dialects, config: ConnectorConfig) -> Result<Self> {
        let pool = dialect.create_connection_pool(&config)?;

        Ok(match (dialect, pool) {
            (Dialects::Postgres, ConnectionPools::NativePostgres(pool)) => {
                Connectors::Postgres(ConnectorState::new(config, pool))
            }
            (Dialects::Redshift, ConnectionPools::NativePostgres(pool)) => {
                Connectors::Redshift(ConnectorState::new(config, pool))
            }
            (dialect, _) => not_supported!("executing queries on {}", dialect.r#type()),
        })
    }

    pub fn dialect(&self) -> Dialects {
        match self {
            Connectors::Postgres(_) => Dialects::Postgres,
            Connectors::Redshift(_) => Dialects::Redshift,
        }
    }

    pub fn schema(&self) -> Result<SchemaResponse> {
        match self {
            Connectors::Postgres(s) => s.schema(),
            Connectors::Redshift(s) => s.schema(),
        }
    }

    pub async fn query(&self, request: QueryRequest) -> Result<QueryResponse> {
        match self {
            Connectors::Postgres(s) => s.query(request).await,
            Connectors::Redshift(s) => s.query(request).await,
        }
    }

    pub fn explain(&self, request: &QueryRequest) -> Result<ExplainResponse> {
        match self {
            Connectors::Postgres(s) => s.explain(request),
            Connectors::Redshift(s) => s.explain(request),
        }
    }

    pub fn mutation(&self, request: Value) -> Result<Value> {
        match self {
            Connectors::Postgres(s) => s.mutation(request),
            Connectors::Redshift(s) => s.mutation(request),
        }
    }

    pub async fn sql(&self, sql: String) -> Result<Vec<ResponseRow>> {
        match self {
            Connectors::Postgres(s) => s.sql(sql).await,
            Connectors::Redshift(s) => s.sql(sql).await,
        }
    }
}
