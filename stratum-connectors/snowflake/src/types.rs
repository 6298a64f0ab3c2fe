use stratum_connectors_base::{
    common::{
        default_cast_type, default_comparison_operators, numeric_representation, CastType,
        TypeName, EXTENDED_NUMERIC_AGGREGATES,
    },
    interface::ColumnType,
};
use stratum_core::proto::{ComparisonOperator, TypeRepresentation};

/// Snowflake column types.
///
/// Every fixed point type, including the integer aliases, is a `NUMBER`.
#[derive(Debug, Clone, PartialEq)]
pub enum SnowflakeColumnType {
    Number { precision: u32, scale: u32 },
    Float,
    Varchar,
    Binary,
    Boolean,
    Date,
    Time,
    TimestampNtz,
    TimestampLtz,
    TimestampTz,
    Variant,
    Object,
    Array,
    Vector,
    Geography,
    Geometry,
    Unknown(String),
}

impl ColumnType for SnowflakeColumnType {
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

        match ty.name.as_str() {
            "NUMBER" | "DECIMAL" | "DEC" | "NUMERIC" => {
                let (precision, scale) = ty.precision_scale(38, 0);
                Self::Number { precision, scale }
            }
            "INT" | "INTEGER" | "BIGINT" | "SMALLINT" | "TINYINT" | "BYTEINT" => Self::Number {
                precision: 38,
                scale: 0,
            },
            "FLOAT" | "FLOAT4" | "FLOAT8" | "DOUBLE" | "DOUBLE PRECISION" | "REAL" => Self::Float,
            "VARCHAR" | "STRING" | "TEXT" | "CHAR" | "CHARACTER" | "NCHAR" | "NVARCHAR"
            | "NVARCHAR2" | "CHAR VARYING" | "NCHAR VARYING" => Self::Varchar,
            "BINARY" | "VARBINARY" => Self::Binary,
            "BOOLEAN" => Self::Boolean,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "TIMESTAMP" | "DATETIME" | "TIMESTAMP_NTZ" | "TIMESTAMPNTZ"
            | "TIMESTAMP WITHOUT TIME ZONE" => Self::TimestampNtz,
            "TIMESTAMP_LTZ" | "TIMESTAMPLTZ" | "TIMESTAMP WITH LOCAL TIME ZONE" => {
                Self::TimestampLtz
            }
            "TIMESTAMP_TZ" | "TIMESTAMPTZ" | "TIMESTAMP WITH TIME ZONE" => Self::TimestampTz,
            "VARIANT" => Self::Variant,
            "OBJECT" => Self::Object,
            "ARRAY" => Self::Array,
            "VECTOR" => Self::Vector,
            "GEOGRAPHY" => Self::Geography,
            "GEOMETRY" => Self::Geometry,
            _ => Self::Unknown(type_name.trim().to_string()),
        }
    }

    fn type_name(&self) -> String {
        match self {
            Self::Number { precision, scale } => format!("NUMBER({},{})", precision, scale),
            Self::Float => "FLOAT".into(),
            Self::Varchar => "VARCHAR".into(),
            Self::Binary => "BINARY".into(),
            Self::Boolean => "BOOLEAN".into(),
            Self::Date => "DATE".into(),
            Self::Time => "TIME".into(),
            Self::TimestampNtz => "TIMESTAMP_NTZ".into(),
            Self::TimestampLtz => "TIMESTAMP_LTZ".into(),
            Self::TimestampTz => "TIMESTAMP_TZ".into(),
            Self::Variant => "VARIANT".into(),
            Self::Object => "OBJECT".into(),
            Self::Array => "ARRAY".into(),
            Self::Vector => "VECTOR".into(),
            Self::Geography => "GEOGRAPHY".into(),
            Self::Geometry => "GEOMETRY".into(),
            Self::Unknown(name) => name.clone(),
        }
    }

    fn representation(&self) -> Option<TypeRepresentation> {
        Some(match self {
            Self::Number { precision, scale } => numeric_representation(*precision, *scale),
            Self::Float => TypeRepresentation::Float64,
            Self::Varchar | Self::Time => TypeRepresentation::String,
            Self::Binary => TypeRepresentation::Bytes,
            Self::Boolean => TypeRepresentation::Boolean,
            Self::Date => TypeRepresentation::Date,
            Self::TimestampNtz => TypeRepresentation::Timestamp,
            Self::TimestampLtz | Self::TimestampTz => TypeRepresentation::TimestampTZ,
            Self::Variant | Self::Object | Self::Array | Self::Vector => TypeRepresentation::JSON,
            Self::Geography => TypeRepresentation::Geography,
            Self::Geometry => TypeRepresentation::Geometry,
            Self::Unknown(_) => return None,
        })
    }

    fn cast_type(&self) -> CastType {
        match self {
            Self::Time => CastType::String,
            _ => default_cast_type(self.representation()),
        }
    }

    fn comparison_operators(&self) -> Vec<ComparisonOperator> {
        default_comparison_operators(
            self.representation(),
            match self {
                Self::Varchar => Self::STRING_OPERATORS,
                _ => &[],
            },
        )
    }
}
