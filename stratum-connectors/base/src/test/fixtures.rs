use serde_json::{json, Value};
use stratum_core::{config::ConnectorConfig, proto::QueryRequest};

/// A catalog with an `orders` table of the supplied columns, the first
/// being its primary key, and a `big_orders` native query over it
pub fn orders_config(columns: &[(&str, &str)]) -> ConnectorConfig {
    let cols = columns
        .iter()
        .map(|(name, ty)| json!({"name": name, "type": ty}))
        .collect::<Vec<_>>();
    let (pk, pk_type) = columns.first().copied().unwrap_or(("id", "INT"));

    serde_json::from_value(json!({
        "connection_uri": {"value": "mock://"},
        "tables": [
            {
                "name": "orders",
                "columns": cols,
                "primary_keys": [pk]
            }
        ],
        "native_operations": {
            "big_orders": {
                "sql": "SELECT * FROM orders WHERE total > {{min}}",
                "columns": {pk: {"type": pk_type}},
                "arguments": {"min": {"type": pk_type}}
            }
        }
    }))
    .unwrap()
}

pub fn query_request(request: Value) -> QueryRequest {
    serde_json::from_value(request).unwrap()
}
