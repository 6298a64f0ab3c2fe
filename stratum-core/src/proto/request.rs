use std::fmt::Display;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::err::Result;

/// A query against a single collection, optionally batched over sets of
/// variable bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub collection: String,
    pub query: Query,
    #[serde(default)]
    pub arguments: IndexMap<String, Argument>,
    #[serde(default)]
    pub collection_relationships: IndexMap<String, Value>,
    /// Absent (or null) means a single unbatched query, an empty list means
    /// no row sets at all
    #[serde(default)]
    pub variables: Option<Vec<IndexMap<String, Value>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<IndexMap<String, Aggregate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<String, Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, alias = "orderBy", skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    #[serde(default, alias = "where", skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Argument {
    Literal { value: Value },
    Variable { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Field {
    Column {
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fields: Option<Value>,
    },
    Relationship {
        relationship: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<Box<Query>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Aggregate {
    StarCount,
    ColumnCount {
        column: String,
        #[serde(default)]
        distinct: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,
    },
    SingleColumn {
        column: String,
        function: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub elements: Vec<OrderByElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByElement {
    pub order_direction: OrderDirection,
    pub target: OrderByTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderByTarget {
    Column {
        name: String,
        #[serde(default)]
        path: Vec<PathElement>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,
    },
    SingleColumnAggregate {
        column: String,
        function: String,
        #[serde(default)]
        path: Vec<PathElement>,
    },
    StarCountAggregate {
        #[serde(default)]
        path: Vec<PathElement>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    pub relationship: String,
    #[serde(default)]
    pub arguments: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    And {
        expressions: Vec<Expression>,
    },
    Or {
        expressions: Vec<Expression>,
    },
    Not {
        expression: Box<Expression>,
    },
    UnaryComparisonOperator {
        column: ComparisonTarget,
        operator: UnaryComparisonOperator,
    },
    BinaryComparisonOperator {
        column: ComparisonTarget,
        /// The operator token, eg `_eq`, validated when compiled
        operator: String,
        value: ComparisonValue,
    },
    Exists {
        in_collection: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        predicate: Option<Box<Expression>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryComparisonOperator {
    IsNull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonTarget {
    Column {
        name: String,
        #[serde(default)]
        path: Vec<PathElement>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,
    },
    RootCollectionColumn {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_path: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonValue {
    Column { column: ComparisonTarget },
    Scalar { value: Value },
    Variable { name: String },
}

/// The binary comparison operators understood by the query compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    Like,
    NLike,
    ILike,
    NILike,
    Regex,
    NRegex,
    IRegex,
    NIRegex,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 15] = [
        Self::Eq,
        Self::Neq,
        Self::Gt,
        Self::Lt,
        Self::Gte,
        Self::Lte,
        Self::In,
        Self::Like,
        Self::NLike,
        Self::ILike,
        Self::NILike,
        Self::Regex,
        Self::NRegex,
        Self::IRegex,
        Self::NIRegex,
    ];

    /// Parses an operator token, with or without its leading underscore
    pub fn parse(token: &str) -> Result<Self> {
        let name = token.strip_prefix('_').unwrap_or(token);

        match Self::ALL.iter().find(|op| &op.name()[1..] == name) {
            Some(op) => Ok(*op),
            None => crate::not_supported!("comparison operator '{}'", token),
        }
    }

    /// The canonical token of the operator, as exported in the schema
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq => "_eq",
            Self::Neq => "_neq",
            Self::Gt => "_gt",
            Self::Lt => "_lt",
            Self::Gte => "_gte",
            Self::Lte => "_lte",
            Self::In => "_in",
            Self::Like => "_like",
            Self::NLike => "_nlike",
            Self::ILike => "_ilike",
            Self::NILike => "_nilike",
            Self::Regex => "_regex",
            Self::NRegex => "_nregex",
            Self::IRegex => "_iregex",
            Self::NIRegex => "_niregex",
        }
    }

    pub fn is_like(&self) -> bool {
        matches!(self, Self::Like | Self::NLike | Self::ILike | Self::NILike)
    }

    pub fn is_regex(&self) -> bool {
        matches!(
            self,
            Self::Regex | Self::NRegex | Self::IRegex | Self::NIRegex
        )
    }

    pub fn is_case_insensitive(&self) -> bool {
        matches!(
            self,
            Self::ILike | Self::NILike | Self::IRegex | Self::NIRegex
        )
    }

    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            Self::NLike | Self::NILike | Self::NRegex | Self::NIRegex
        )
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl QueryRequest {
    /// Whether the request is compiled into the batched plan
    pub fn is_batched(&self) -> bool {
        self.variables.as_ref().map_or(false, |v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::err::is_not_supported;

    use super::*;

    #[test]
    fn test_parse_operator_tokens() {
        assert_eq!(ComparisonOperator::parse("_eq").unwrap(), ComparisonOperator::Eq);
        assert_eq!(ComparisonOperator::parse("eq").unwrap(), ComparisonOperator::Eq);
        assert_eq!(
            ComparisonOperator::parse("_niregex").unwrap(),
            ComparisonOperator::NIRegex
        );
        assert_eq!(ComparisonOperator::parse("in").unwrap(), ComparisonOperator::In);
    }

    #[test]
    fn test_parse_unknown_operator() {
        let err = ComparisonOperator::parse("_contains").unwrap_err();

        assert!(is_not_supported(&err));
    }

    #[test]
    fn test_operator_flags() {
        assert!(ComparisonOperator::NILike.is_like());
        assert!(ComparisonOperator::NILike.is_negated());
        assert!(ComparisonOperator::NILike.is_case_insensitive());
        assert!(!ComparisonOperator::Regex.is_negated());
        assert!(ComparisonOperator::Regex.is_regex());
        assert!(!ComparisonOperator::Eq.is_like());
    }

    #[test]
    fn test_deserialize_request() {
        let req: QueryRequest = serde_json::from_value(json!({
            "collection": "orders",
            "query": {
                "fields": {
                    "id": {"type": "column", "column": "id"}
                },
                "predicate": {
                    "type": "binary_comparison_operator",
                    "column": {"type": "column", "name": "status"},
                    "operator": "_eq",
                    "value": {"type": "scalar", "value": "shipped"}
                },
                "orderBy": {
                    "elements": [
                        {"order_direction": "desc", "target": {"type": "column", "name": "id"}}
                    ]
                },
                "limit": 10
            }
        }))
        .unwrap();

        assert_eq!(req.collection, "orders");
        assert_eq!(req.variables, None);
        assert!(!req.is_batched());
        assert_eq!(req.query.limit, Some(10));
        assert_eq!(
            req.query.fields.unwrap()["id"],
            Field::Column {
                column: "id".into(),
                fields: None
            }
        );
        assert_eq!(
            req.query.predicate,
            Some(Expression::BinaryComparisonOperator {
                column: ComparisonTarget::Column {
                    name: "status".into(),
                    path: vec![],
                    field_path: None
                },
                operator: "_eq".into(),
                value: ComparisonValue::Scalar {
                    value: json!("shipped")
                }
            })
        );
        assert_eq!(
            req.query.order_by.unwrap().elements[0].order_direction,
            OrderDirection::Desc
        );
    }

    #[test]
    fn test_empty_variables_differs_from_absent() {
        let req: QueryRequest = serde_json::from_value(json!({
            "collection": "orders",
            "query": {},
            "variables": []
        }))
        .unwrap();

        assert_eq!(req.variables, Some(vec![]));
        assert!(!req.is_batched());
    }
}
