use std::{marker::PhantomData, sync::Arc};

use serde_json::Value;
use stratum_core::{
    config::ConnectorConfig,
    data::Row,
    err::{Context, Result},
    not_supported,
    proto::{ExplainResponse, QueryRequest, QueryResponse, ResponseRow, SchemaResponse},
};
use stratum_logging::{debug, info, warn, MaxLogLength, MAX_SQL_LOG_LENGTH};

use crate::{
    compiler::QueryPlanner,
    interface::{Connection, ConnectionPool, Dialect},
};

use super::{to_protocol_value, ResponseAssembler, SchemaBuilder};

/// The shared state of a running connector: its configuration and
/// connection pool
pub struct ConnectorState<D: Dialect, P: ConnectionPool> {
    config: Arc<ConnectorConfig>,
    pool: P,
    _dialect: PhantomData<D>,
}

impl<D: Dialect, P: ConnectionPool> Clone for ConnectorState<D, P> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            pool: self.pool.clone(),
            _dialect: PhantomData,
        }
    }
}

impl<D: Dialect, P: ConnectionPool> ConnectorState<D, P> {
    pub fn new(config: ConnectorConfig, pool: P) -> Self {
        Self {
            config: Arc::new(config),
            pool,
            _dialect: PhantomData,
        }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn schema(&self) -> Result<SchemaResponse> {
        SchemaBuilder::<D::TColumnType>::build(&self.config)
    }

    /// Compiles and executes the request.
    ///
    /// The statements are compiled before anything is sent to the warehouse.
    /// The rows and aggregates statements run concurrently, each on its own
    /// connection, and either failing fails the request.
    pub async fn query(&self, request: QueryRequest) -> Result<QueryResponse> {
        let compiled = QueryPlanner::<D>::compile(&self.config, &request)?;

        let (rows, aggregates) = tokio::try_join!(
            Self::fetch(self.pool.clone(), compiled.rows),
            Self::fetch(self.pool.clone(), compiled.aggregates),
        )?;

        debug!(
            "Fetched {} rows and {} aggregate rows for '{}'",
            rows.as_ref().map_or(0, |r| r.len()),
            aggregates.as_ref().map_or(0, |r| r.len()),
            request.collection
        );

        ResponseAssembler::assemble(&request, rows, aggregates)
    }

    /// Plans are not explained, the request is only validated
    pub fn explain(&self, request: &QueryRequest) -> Result<ExplainResponse> {
        QueryPlanner::<D>::compile(&self.config, request)?;

        Ok(ExplainResponse::placeholder())
    }

    pub fn mutation(&self, _request: Value) -> Result<Value> {
        not_supported!("mutations")
    }

    /// Executes a literal statement and returns its rows
    pub async fn sql(&self, sql: String) -> Result<Vec<ResponseRow>> {
        let rows = Self::fetch(self.pool.clone(), Some(sql))
            .await?
            .unwrap_or_default();

        Ok(rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(col, val)| (col, to_protocol_value(val)))
                    .collect()
            })
            .collect())
    }

    /// Executes the statement on a blocking worker, the connection is
    /// released before the task completes
    async fn fetch(mut pool: P, sql: Option<String>) -> Result<Option<Vec<Row>>> {
        let Some(sql) = sql else {
            return Ok(None);
        };

        let rows = tokio::task::spawn_blocking(move || -> Result<Vec<Row>> {
            let mut con = pool.acquire().context("Failed to acquire connection")?;
            info!("Executing {}", MaxLogLength::new(Some(MAX_SQL_LOG_LENGTH), sql.as_str()));

            con.execute(&sql)
                .map_err(|e| {
                    warn!("Query failed: {:?}", e);
                    e
                })
                .context("Failed to execute query")
        })
        .await
        .context("Query task failed")??;

        Ok(Some(rows))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use stratum_core::{
        config::{ColumnInfo, ConnectionUri, TableCategory, TableInfo},
        data::DataValue,
        err::is_not_supported,
        proto::{ErrorKind, ErrorResponse},
    };

    use crate::test::{MockConnectionPool, MockDialect};

    use super::*;

    fn config() -> ConnectorConfig {
        let mut conf = ConnectorConfig::new(ConnectionUri::Value {
            value: "mock://".into(),
        });
        conf.tables = vec![TableInfo {
            name: "orders".into(),
            category: TableCategory::Table,
            description: None,
            columns: vec![
                ColumnInfo::new("id", "INT", false),
                ColumnInfo::new("total", "DOUBLE", true),
            ],
            primary_keys: vec!["id".into()],
            foreign_keys: Default::default(),
        }];
        conf
    }

    fn state(pool: &MockConnectionPool) -> ConnectorState<MockDialect, MockConnectionPool> {
        ConnectorState::new(config(), pool.clone())
    }

    fn request(value: Value) -> QueryRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_query_rows_and_aggregates() {
        let pool = MockConnectionPool::new();
        pool.rows_for(
            "COUNT(*)",
            vec![vec![("count".to_string(), DataValue::Int64(2))]],
        );
        pool.rows_for(
            "\"orders\".\"id\" AS \"id\"",
            vec![
                vec![("id".to_string(), DataValue::Int32(1))],
                vec![("id".to_string(), DataValue::Int32(2))],
            ],
        );

        let res = state(&pool)
            .query(request(json!({
                "collection": "orders",
                "query": {
                    "fields": {"id": {"type": "column", "column": "id"}},
                    "aggregates": {"count": {"type": "star_count"}}
                }
            })))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(res).unwrap(),
            json!({"rowSets": [{"rows": [{"id": 1}, {"id": 2}], "aggregates": {"count": 2}}]})
        );

        let mut executed = pool.executed();
        executed.sort();
        assert_eq!(
            executed,
            vec![
                "SELECT \"orders\".\"id\" AS \"id\" FROM \"orders\"".to_string(),
                "SELECT COUNT(*) AS \"count\" FROM \"orders\"".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_query_compile_error_executes_nothing() {
        let pool = MockConnectionPool::new();

        let err = state(&pool)
            .query(request(json!({
                "collection": "orders",
                "query": {
                    "fields": {"id": {"type": "column", "column": "id"}},
                    "predicate": {"type": "exists", "in_collection": {"type": "unrelated", "collection": "x"}}
                }
            })))
            .await
            .unwrap_err();

        assert!(is_not_supported(&err));
        assert!(pool.executed().is_empty());
    }

    #[tokio::test]
    async fn test_query_execution_error_fails_request() {
        let pool = MockConnectionPool::new();
        pool.error_for("COUNT(*)", "warehouse unavailable");

        let err = state(&pool)
            .query(request(json!({
                "collection": "orders",
                "query": {
                    "fields": {"id": {"type": "column", "column": "id"}},
                    "aggregates": {"count": {"type": "star_count"}}
                }
            })))
            .await
            .unwrap_err();

        let res = ErrorResponse::from(&err);
        assert_eq!(res.kind, ErrorKind::InternalServerError);
        assert!(format!("{:#}", err).contains("warehouse unavailable"));
    }

    #[tokio::test]
    async fn test_query_empty_variables_executes_nothing() {
        let pool = MockConnectionPool::new();

        let res = state(&pool)
            .query(request(json!({
                "collection": "orders",
                "query": {"fields": {"id": {"type": "column", "column": "id"}}},
                "variables": []
            })))
            .await
            .unwrap();

        assert_eq!(res.row_sets, vec![]);
        assert!(pool.executed().is_empty());
    }

    #[tokio::test]
    async fn test_query_batched() {
        let pool = MockConnectionPool::new();
        pool.push_rows(vec![
            vec![
                ("id".to_string(), DataValue::Int32(1)),
                ("_idx".to_string(), DataValue::Int64(0)),
            ],
            vec![
                ("id".to_string(), DataValue::Int32(2)),
                ("_idx".to_string(), DataValue::Int64(1)),
            ],
        ]);

        let res = state(&pool)
            .query(request(json!({
                "collection": "orders",
                "query": {
                    "fields": {"id": {"type": "column", "column": "id"}},
                    "predicate": {
                        "type": "binary_comparison_operator",
                        "column": {"type": "column", "name": "id"},
                        "operator": "_eq",
                        "value": {"type": "variable", "name": "id"}
                    }
                },
                "variables": [{"id": 1}, {"id": 2}]
            })))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(res).unwrap(),
            json!({"rowSets": [{"rows": [{"id": 1}]}, {"rows": [{"id": 2}]}]})
        );
        assert_eq!(pool.executed().len(), 1);
        assert!(pool.executed()[0].starts_with("WITH \"_vars\" AS ("));
    }

    #[tokio::test]
    async fn test_sql_passthrough() {
        let pool = MockConnectionPool::new();
        pool.push_rows(vec![vec![("one".to_string(), "[1]".into())]]);

        let rows = state(&pool).sql("SELECT '[1]' AS one".into()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["one"], json!([1]));
        assert_eq!(pool.executed(), vec!["SELECT '[1]' AS one".to_string()]);
    }

    #[test]
    fn test_explain_placeholder() {
        let pool = MockConnectionPool::new();

        let res = state(&pool)
            .explain(&request(json!({"collection": "orders", "query": {}})))
            .unwrap();

        assert_eq!(res, ExplainResponse::placeholder());
    }

    #[test]
    fn test_mutation_not_supported() {
        let pool = MockConnectionPool::new();

        let err = state(&pool).mutation(json!({})).unwrap_err();

        assert!(is_not_supported(&err));
    }

    #[test]
    fn test_schema() {
        let pool = MockConnectionPool::new();

        let schema = state(&pool).schema().unwrap();

        assert_eq!(schema.collections.len(), 1);
        assert_eq!(
            schema.collections[0].uniqueness_constraints["orders_pkey"].unique_columns,
            vec!["id".to_string()]
        );
        assert!(schema.scalar_types.contains_key("INT"));
        assert!(schema.scalar_types.contains_key("DOUBLE"));
        assert!(schema.scalar_types.contains_key("Float64"));
    }
}
