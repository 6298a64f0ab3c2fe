use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The schema of the connector, derived from its configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchemaResponse {
    pub scalar_types: IndexMap<String, ScalarType>,
    pub object_types: IndexMap<String, ObjectType>,
    pub collections: Vec<CollectionInfo>,
    pub functions: Vec<Value>,
    pub procedures: Vec<Value>,
}

/// The canonical scalar kind of a column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeRepresentation {
    Boolean,
    String,
    Int8,
    Int16,
    Int32,
    Int64,
    BigInteger,
    Float32,
    Float64,
    BigDecimal,
    Date,
    Timestamp,
    TimestampTZ,
    Geography,
    Geometry,
    Bytes,
    JSON,
}

impl TypeRepresentation {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::BigInteger
                | Self::Float32
                | Self::Float64
                | Self::BigDecimal
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Timestamp | Self::TimestampTZ)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representation: Option<TypeRepresentation>,
    pub aggregate_functions: IndexMap<String, AggregateFunctionDefinition>,
    pub comparison_operators: IndexMap<String, ComparisonOperatorDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateFunctionDefinition {
    pub result_type: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonOperatorDefinition {
    Equal,
    In,
    Custom { argument_type: Type },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Type {
    Named { name: String },
    Nullable { underlying_type: Box<Type> },
    Array { element_type: Box<Type> },
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named { name: name.into() }
    }

    pub fn nullable(self) -> Self {
        Type::Nullable {
            underlying_type: Box::new(self),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: IndexMap<String, ObjectField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub arguments: IndexMap<String, ArgumentInfo>,
    /// The name of the object type of the rows
    #[serde(rename = "type")]
    pub r#type: String,
    pub uniqueness_constraints: IndexMap<String, UniquenessConstraint>,
    pub foreign_keys: IndexMap<String, ForeignKeyConstraint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniquenessConstraint {
    pub unique_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    pub column_mapping: IndexMap<String, String>,
    pub foreign_collection: String,
}
