use stratum_connectors_base::{
    common::{
        default_aggregate_functions, default_cast_type, default_comparison_operators,
        numeric_representation, CastType, TypeName, STANDARD_NUMERIC_AGGREGATES,
    },
    interface::ColumnType,
};
use stratum_core::proto::{ComparisonOperator, TypeRepresentation};

/// Redshift column types
#[derive(Debug, Clone, PartialEq)]
pub enum RedshiftColumnType {
    SmallInt,
    Integer,
    BigInt,
    Decimal { precision: u32, scale: u32 },
    Real,
    Double,
    Boolean,
    Char,
    Varchar,
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Interval,
    Geometry,
    Geography,
    HllSketch,
    Super,
    Varbyte,
    Unknown(String),
}

impl RedshiftColumnType {
    pub(crate) fn is_text(&self) -> bool {
        matches!(self, Self::Char | Self::Varchar)
    }
}

impl ColumnType for RedshiftColumnType {
    const STRING_OPERATORS: &'static [ComparisonOperator] = &[
        ComparisonOperator::Like,
        ComparisonOperator::NLike,
        ComparisonOperator::ILike,
        ComparisonOperator::NILike,
        ComparisonOperator::Regex,
        ComparisonOperator::NRegex,
    ];

    const NUMERIC_AGGREGATES: &'static [&'static str] = STANDARD_NUMERIC_AGGREGATES;

    fn parse(type_name: &str) -> Self {
        let ty = TypeName::parse(type_name);

        match ty.name.as_str() {
            "SMALLINT" | "INT2" => Self::SmallInt,
            "INTEGER" | "INT" | "INT4" => Self::Integer,
            "BIGINT" | "INT8" => Self::BigInt,
            "DECIMAL" | "NUMERIC" => {
                let (precision, scale) = ty.precision_scale(18, 0);
                Self::Decimal { precision, scale }
            }
            "REAL" | "FLOAT4" => Self::Real,
            "DOUBLE PRECISION" | "FLOAT8" | "FLOAT" => Self::Double,
            "BOOLEAN" | "BOOL" => Self::Boolean,
            "CHAR" | "CHARACTER" | "NCHAR" | "BPCHAR" => Self::Char,
            "VARCHAR" | "CHARACTER VARYING" | "NVARCHAR" | "TEXT" => Self::Varchar,
            "DATE" => Self::Date,
            "TIME" | "TIME WITHOUT TIME ZONE" => Self::Time,
            "TIMETZ" | "TIME WITH TIME ZONE" => Self::TimeTz,
            "TIMESTAMP" | "TIMESTAMP WITHOUT TIME ZONE" => Self::Timestamp,
            "TIMESTAMPTZ" | "TIMESTAMP WITH TIME ZONE" => Self::TimestampTz,
            "GEOMETRY" => Self::Geometry,
            "GEOGRAPHY" => Self::Geography,
            "HLLSKETCH" => Self::HllSketch,
            "SUPER" => Self::Super,
            "VARBYTE" | "VARBINARY" | "BINARY VARYING" => Self::Varbyte,
            name if name.starts_with("INTERVAL") => Self::Interval,
            _ => Self::Unknown(type_name.trim().to_string()),
        }
    }

    fn type_name(&self) -> String {
        match self {
            Self::SmallInt => "SMALLINT".into(),
            Self::Integer => "INTEGER".into(),
            Self::BigInt => "BIGINT".into(),
            Self::Decimal { precision, scale } => format!("DECIMAL({},{})", precision, scale),
            Self::Real => "REAL".into(),
            Self::Double => "DOUBLE PRECISION".into(),
            Self::Boolean => "BOOLEAN".into(),
            Self::Char => "CHAR".into(),
            Self::Varchar => "VARCHAR".into(),
            Self::Date => "DATE".into(),
            Self::Time => "TIME".into(),
            Self::TimeTz => "TIMETZ".into(),
            Self::Timestamp => "TIMESTAMP".into(),
            Self::TimestampTz => "TIMESTAMPTZ".into(),
            Self::Interval => "INTERVAL".into(),
            Self::Geometry => "GEOMETRY".into(),
            Self::Geography => "GEOGRAPHY".into(),
            Self::HllSketch => "HLLSKETCH".into(),
            Self::Super => "SUPER".into(),
            Self::Varbyte => "VARBYTE".into(),
            Self::Unknown(name) => name.clone(),
        }
    }

    fn representation(&self) -> Option<TypeRepresentation> {
        Some(match self {
            Self::SmallInt => TypeRepresentation::Int16,
            Self::Integer => TypeRepresentation::Int32,
            Self::BigInt => TypeRepresentation::Int64,
            Self::Decimal { precision, scale } => numeric_representation(*precision, *scale),
            Self::Real => TypeRepresentation::Float32,
            Self::Double => TypeRepresentation::Float64,
            Self::Boolean => TypeRepresentation::Boolean,
            Self::Char | Self::Varchar => TypeRepresentation::String,
            Self::Time | Self::TimeTz | Self::Interval | Self::HllSketch => {
                TypeRepresentation::String
            }
            Self::Date => TypeRepresentation::Date,
            Self::Timestamp => TypeRepresentation::Timestamp,
            Self::TimestampTz => TypeRepresentation::TimestampTZ,
            Self::Geometry => TypeRepresentation::Geometry,
            Self::Geography => TypeRepresentation::Geography,
            Self::Super => TypeRepresentation::JSON,
            Self::Varbyte => TypeRepresentation::Bytes,
            Self::Unknown(_) => return None,
        })
    }

    fn cast_type(&self) -> CastType {
        match self {
            Self::Time | Self::TimeTz | Self::Interval | Self::HllSketch => CastType::String,
            Self::Super => CastType::Json,
            _ => default_cast_type(self.representation()),
        }
    }

    fn aggregate_functions(&self) -> Vec<&'static str> {
        match self {
            Self::HllSketch => vec![],
            _ => default_aggregate_functions(self.representation(), Self::NUMERIC_AGGREGATES),
        }
    }

    fn comparison_operators(&self) -> Vec<ComparisonOperator> {
        default_comparison_operators(
            self.representation(),
            if self.is_text() {
                Self::STRING_OPERATORS
            } else {
                &[]
            },
        )
    }
}
