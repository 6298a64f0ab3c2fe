use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::err::{is_invalid_request, is_not_supported, Error, InvalidRequest, NotSupported};

/// A row of a row set, keyed by the caller's field alias
pub type ResponseRow = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(rename = "rowSets", alias = "row_sets")]
    pub row_sets: Vec<RowSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RowSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<ResponseRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<ResponseRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub details: IndexMap<String, String>,
}

impl ExplainResponse {
    /// Plans are not explained, the response is always the same
    pub fn placeholder() -> Self {
        Self {
            details: IndexMap::from([(
                "explain".to_string(),
                "<query plan explanation is not implemented>".to_string(),
            )]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotSupported,
    BadRequest,
    InternalServerError,
}

/// An error as reported to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Value,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        if is_not_supported(err) {
            let reason = err
                .chain()
                .find_map(|e| e.downcast_ref::<NotSupported>())
                .map(|e| e.reason().to_string())
                .unwrap_or_default();

            return Self {
                kind: ErrorKind::NotSupported,
                message: err.to_string(),
                details: json!({ "reason": reason }),
            };
        }

        if is_invalid_request(err) {
            let reason = err
                .chain()
                .find_map(|e| e.downcast_ref::<InvalidRequest>())
                .map(|e| e.reason().to_string())
                .unwrap_or_default();

            return Self {
                kind: ErrorKind::BadRequest,
                message: err.to_string(),
                details: json!({ "reason": reason }),
            };
        }

        Self {
            kind: ErrorKind::InternalServerError,
            message: err.to_string(),
            details: json!({ "cause": format!("{:#}", err) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::err::{anyhow, Context, Result};

    use super::*;

    #[test]
    fn test_serialize_query_response() {
        let res = QueryResponse {
            row_sets: vec![
                RowSet {
                    rows: Some(vec![IndexMap::from([("id".to_string(), json!(1))])]),
                    aggregates: None,
                },
                RowSet::default(),
            ],
        };

        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            json!({"rowSets": [{"rows": [{"id": 1}]}, {}]})
        );
    }

    #[test]
    fn test_error_response_not_supported() {
        let err = (|| -> Result<()> { crate::not_supported!("EXISTS expressions") })()
            .context("Failed to compile query")
            .unwrap_err();

        let res = ErrorResponse::from(&err);

        assert_eq!(res.kind, ErrorKind::NotSupported);
        assert_eq!(res.details, json!({"reason": "EXISTS expressions"}));
    }

    #[test]
    fn test_error_response_invalid_request() {
        let err = (|| -> Result<()> { crate::invalid_request!("unknown collection 'x'") })()
            .unwrap_err();

        let res = ErrorResponse::from(&err);

        assert_eq!(res.kind, ErrorKind::BadRequest);
        assert_eq!(res.message, "Invalid request: unknown collection 'x'");
    }

    #[test]
    fn test_error_response_internal() {
        let err = anyhow!("connection reset").context("Failed to execute query");

        let res = ErrorResponse::from(&err);

        assert_eq!(res.kind, ErrorKind::InternalServerError);
        assert_eq!(res.message, "Failed to execute query");
        assert_eq!(
            res.details,
            json!({"cause": "Failed to execute query: connection reset"})
        );
    }
}
