use stratum_connectors_base::{
    common::{
        default_cast_type, default_comparison_operators, numeric_representation, split_field,
        CastType, TypeName, EXTENDED_NUMERIC_AGGREGATES,
    },
    interface::ColumnType,
};
use stratum_core::proto::{ComparisonOperator, TypeRepresentation};

/// BigQuery column types, scalars nested in arrays, ranges and structs
#[derive(Debug, Clone, PartialEq)]
pub enum BigQueryColumnType {
    Scalar(BigQueryScalarType),
    Array(Box<BigQueryColumnType>),
    Range(Box<BigQueryColumnType>),
    Struct(Vec<(String, BigQueryColumnType)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BigQueryScalarType {
    Int64,
    Numeric { precision: u32, scale: u32 },
    BigNumeric { precision: u32, scale: u32 },
    Float64,
    Bool,
    String,
    Bytes,
    Date,
    Datetime,
    Time,
    Timestamp,
    Interval,
    Geography,
    Json,
    Unknown(String),
}

impl BigQueryScalarType {
    pub fn parse(ty: &TypeName, text: &str) -> Self {
        match ty.name.as_str() {
            "INT64" | "INT" | "SMALLINT" | "INTEGER" | "BIGINT" | "TINYINT" | "BYTEINT" => {
                Self::Int64
            }
            "NUMERIC" | "DECIMAL" => {
                let (precision, scale) = ty.precision_scale(38, 9);
                Self::Numeric { precision, scale }
            }
            "BIGNUMERIC" | "BIGDECIMAL" => {
                let (precision, scale) = ty.precision_scale(76, 38);
                Self::BigNumeric { precision, scale }
            }
            "FLOAT64" | "FLOAT" => Self::Float64,
            "BOOL" | "BOOLEAN" => Self::Bool,
            "STRING" => Self::String,
            "BYTES" => Self::Bytes,
            "DATE" => Self::Date,
            "DATETIME" => Self::Datetime,
            "TIME" => Self::Time,
            "TIMESTAMP" => Self::Timestamp,
            "INTERVAL" => Self::Interval,
            "GEOGRAPHY" => Self::Geography,
            "JSON" => Self::Json,
            _ => Self::Unknown(text.trim().to_string()),
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            Self::Int64 => "INT64".into(),
            Self::Numeric { precision, scale } => format!("NUMERIC({},{})", precision, scale),
            Self::BigNumeric { precision, scale } => {
                format!("BIGNUMERIC({},{})", precision, scale)
            }
            Self::Float64 => "FLOAT64".into(),
            Self::Bool => "BOOL".into(),
            Self::String => "STRING".into(),
            Self::Bytes => "BYTES".into(),
            Self::Date => "DATE".into(),
            Self::Datetime => "DATETIME".into(),
            Self::Time => "TIME".into(),
            Self::Timestamp => "TIMESTAMP".into(),
            Self::Interval => "INTERVAL".into(),
            Self::Geography => "GEOGRAPHY".into(),
            Self::Json => "JSON".into(),
            Self::Unknown(name) => name.clone(),
        }
    }

    pub fn representation(&self) -> Option<TypeRepresentation> {
        Some(match self {
            Self::Int64 => TypeRepresentation::Int64,
            Self::Numeric { precision, scale } | Self::BigNumeric { precision, scale } => {
                numeric_representation(*precision, *scale)
            }
            Self::Float64 => TypeRepresentation::Float64,
            Self::Bool => TypeRepresentation::Boolean,
            Self::String | Self::Time | Self::Interval => TypeRepresentation::String,
            Self::Bytes => TypeRepresentation::Bytes,
            Self::Date => TypeRepresentation::Date,
            Self::Datetime => TypeRepresentation::Timestamp,
            Self::Timestamp => TypeRepresentation::TimestampTZ,
            Self::Geography => TypeRepresentation::Geography,
            Self::Json => TypeRepresentation::JSON,
            Self::Unknown(_) => return None,
        })
    }
}

impl ColumnType for BigQueryColumnType {
    const STRING_OPERATORS: &'static [ComparisonOperator] = &[
        ComparisonOperator::Like,
        ComparisonOperator::NLike,
        ComparisonOperator::ILike,
        ComparisonOperator::NILike,
        ComparisonOperator::Regex,
        ComparisonOperator::NRegex,
        ComparisonOperator::IRegex,
        ComparisonOperator::NIRegex,
    ];

    const NUMERIC_AGGREGATES: &'static [&'static str] = EXTENDED_NUMERIC_AGGREGATES;

    fn parse(type_name: &str) -> Self {
        let ty = TypeName::parse(type_name);
        let inner = || {
            ty.args
                .first()
                .map(|a| Self::parse(a))
                .unwrap_or_else(|| Self::Scalar(BigQueryScalarType::Unknown(String::new())))
        };

        match ty.name.as_str() {
            "ARRAY" => Self::Array(Box::new(inner())),
            "RANGE" => Self::Range(Box::new(inner())),
            "STRUCT" => Self::Struct(
                ty.args
                    .iter()
                    .map(|f| {
                        let (name, ty) = split_field(f);
                        (name, Self::parse(&ty))
                    })
                    .collect(),
            ),
            _ => Self::Scalar(BigQueryScalarType::parse(&ty, type_name)),
        }
    }

    fn type_name(&self) -> String {
        match self {
            Self::Scalar(s) => s.type_name(),
            Self::Array(inner) => format!("ARRAY<{}>", inner.type_name()),
            Self::Range(inner) => format!("RANGE<{}>", inner.type_name()),
            Self::Struct(fields) => format!(
                "STRUCT<{}>",
                fields
                    .iter()
                    .map(|(name, ty)| format!("{} {}", name, ty.type_name()))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    fn representation(&self) -> Option<TypeRepresentation> {
        match self {
            Self::Scalar(s) => s.representation(),
            Self::Array(_) | Self::Range(_) | Self::Struct(_) => Some(TypeRepresentation::JSON),
        }
    }

    fn cast_type(&self) -> CastType {
        match self {
            Self::Scalar(BigQueryScalarType::Json) => CastType::Json,
            Self::Scalar(BigQueryScalarType::Time | BigQueryScalarType::Interval) => {
                CastType::String
            }
            Self::Scalar(_) => default_cast_type(self.representation()),
            Self::Array(_) | Self::Range(_) | Self::Struct(_) => CastType::Json,
        }
    }

    fn comparison_operators(&self) -> Vec<ComparisonOperator> {
        default_comparison_operators(
            self.representation(),
            match self {
                Self::Scalar(BigQueryScalarType::String) => Self::STRING_OPERATORS,
                _ => &[],
            },
        )
    }
}
