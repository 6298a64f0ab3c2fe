use stratum_connectors_base::{
    common::{
        default_aggregate_functions, default_cast_type, default_comparison_operators,
        numeric_representation, sanitize_type_name, CastType, TypeName,
        STANDARD_NUMERIC_AGGREGATES,
    },
    interface::ColumnType,
};
use stratum_core::proto::{ComparisonOperator, TypeRepresentation};

/// Postgres column types
#[derive(Debug, Clone, PartialEq)]
pub enum PostgresColumnType {
    SmallInt,
    Integer,
    BigInt,
    /// Unconstrained when the precision is absent
    Numeric {
        precision: Option<u32>,
        scale: u32,
    },
    Real,
    Double,
    Varchar,
    Char,
    Text,
    Bytea,
    Boolean,
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Interval,
    Uuid,
    Json,
    Jsonb,
    Geography,
    Geometry,
    Array(Box<PostgresColumnType>),
    Unknown(String),
}

impl PostgresColumnType {
    pub(crate) fn is_text(&self) -> bool {
        matches!(self, Self::Varchar | Self::Char | Self::Text)
    }
}

impl ColumnType for PostgresColumnType {
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

    const NUMERIC_AGGREGATES: &'static [&'static str] = STANDARD_NUMERIC_AGGREGATES;

    fn parse(type_name: &str) -> Self {
        let trimmed = type_name.trim();

        if let Some(inner) = trimmed.strip_suffix("[]") {
            return Self::Array(Box::new(Self::parse(inner)));
        }

        let ty = TypeName::parse(trimmed);

        if let Some(inner) = ty.name.strip_suffix(" ARRAY") {
            return Self::Array(Box::new(Self::parse(inner)));
        }

        match ty.name.as_str() {
            "SMALLINT" | "INT2" | "SMALLSERIAL" | "SERIAL2" => Self::SmallInt,
            "INTEGER" | "INT" | "INT4" | "SERIAL" | "SERIAL4" => Self::Integer,
            "BIGINT" | "INT8" | "BIGSERIAL" | "SERIAL8" => Self::BigInt,
            "NUMERIC" | "DECIMAL" => Self::Numeric {
                precision: ty.arg_u32(0),
                scale: ty.arg_u32(1).unwrap_or(0),
            },
            "REAL" | "FLOAT4" => Self::Real,
            "DOUBLE PRECISION" | "FLOAT8" | "FLOAT" => Self::Double,
            "CHARACTER VARYING" | "VARCHAR" => Self::Varchar,
            "CHARACTER" | "CHAR" | "BPCHAR" => Self::Char,
            "TEXT" | "NAME" | "CITEXT" => Self::Text,
            "BYTEA" => Self::Bytea,
            "BOOLEAN" | "BOOL" => Self::Boolean,
            "DATE" => Self::Date,
            "TIME" | "TIME WITHOUT TIME ZONE" => Self::Time,
            "TIMETZ" | "TIME WITH TIME ZONE" => Self::TimeTz,
            "TIMESTAMP" | "TIMESTAMP WITHOUT TIME ZONE" => Self::Timestamp,
            "TIMESTAMPTZ" | "TIMESTAMP WITH TIME ZONE" => Self::TimestampTz,
            "UUID" => Self::Uuid,
            "JSON" => Self::Json,
            "JSONB" => Self::Jsonb,
            "GEOGRAPHY" => Self::Geography,
            "GEOMETRY" => Self::Geometry,
            // interval carries its field qualifier, eg INTERVAL DAY TO SECOND
            name if name == "INTERVAL" || name.starts_with("INTERVAL ") => Self::Interval,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }

    fn type_name(&self) -> String {
        match self {
            Self::SmallInt => "SMALLINT".into(),
            Self::Integer => "INTEGER".into(),
            Self::BigInt => "BIGINT".into(),
            Self::Numeric {
                precision: Some(p),
                scale,
            } => format!("NUMERIC({},{})", p, scale),
            Self::Numeric { precision: None, .. } => "NUMERIC".into(),
            Self::Real => "REAL".into(),
            Self::Double => "DOUBLE PRECISION".into(),
            Self::Varchar => "VARCHAR".into(),
            Self::Char => "CHAR".into(),
            Self::Text => "TEXT".into(),
            Self::Bytea => "BYTEA".into(),
            Self::Boolean => "BOOLEAN".into(),
            Self::Date => "DATE".into(),
            Self::Time => "TIME".into(),
            Self::TimeTz => "TIMETZ".into(),
            Self::Timestamp => "TIMESTAMP".into(),
            Self::TimestampTz => "TIMESTAMPTZ".into(),
            Self::Interval => "INTERVAL".into(),
            Self::Uuid => "UUID".into(),
            Self::Json => "JSON".into(),
            Self::Jsonb => "JSONB".into(),
            Self::Geography => "GEOGRAPHY".into(),
            Self::Geometry => "GEOMETRY".into(),
            Self::Array(inner) => format!("{}[]", inner.type_name()),
            Self::Unknown(name) => name.clone(),
        }
    }

    fn representation(&self) -> Option<TypeRepresentation> {
        Some(match self {
            Self::SmallInt => TypeRepresentation::Int16,
            Self::Integer => TypeRepresentation::Int32,
            Self::BigInt => TypeRepresentation::Int64,
            Self::Numeric {
                precision: Some(p),
                scale,
            } => numeric_representation(*p, *scale),
            Self::Numeric { precision: None, .. } => TypeRepresentation::BigDecimal,
            Self::Real => TypeRepresentation::Float32,
            Self::Double => TypeRepresentation::Float64,
            Self::Varchar | Self::Char | Self::Text => TypeRepresentation::String,
            Self::Time | Self::TimeTz | Self::Interval | Self::Uuid => TypeRepresentation::String,
            Self::Bytea => TypeRepresentation::Bytes,
            Self::Boolean => TypeRepresentation::Boolean,
            Self::Date => TypeRepresentation::Date,
            Self::Timestamp => TypeRepresentation::Timestamp,
            Self::TimestampTz => TypeRepresentation::TimestampTZ,
            Self::Json | Self::Jsonb | Self::Array(_) => TypeRepresentation::JSON,
            Self::Geography => TypeRepresentation::Geography,
            Self::Geometry => TypeRepresentation::Geometry,
            Self::Unknown(_) => return None,
        })
    }

    fn cast_type(&self) -> CastType {
        match self {
            Self::Time | Self::TimeTz | Self::Interval | Self::Uuid => CastType::String,
            Self::Array(_) => CastType::Json,
            _ => default_cast_type(self.representation()),
        }
    }

    fn aggregate_functions(&self) -> Vec<&'static str> {
        match self {
            // postgres has no ordering aggregates over uuid
            Self::Uuid => vec![],
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

    fn scalar_type_name(&self) -> String {
        match self {
            Self::Array(inner) => format!("{}_ARRAY", inner.scalar_type_name()),
            _ => sanitize_type_name(&self.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rep(ty: &str) -> Option<TypeRepresentation> {
        PostgresColumnType::parse(ty).representation()
    }

    #[test]
    fn test_parse_integers_and_aliases() {
        assert_eq!(
            PostgresColumnType::parse("serial"),
            PostgresColumnType::Integer
        );
        assert_eq!(
            PostgresColumnType::parse("bigserial"),
            PostgresColumnType::BigInt
        );
        assert_eq!(
            PostgresColumnType::parse("int2"),
            PostgresColumnType::SmallInt
        );
        assert_eq!(rep("integer"), Some(TypeRepresentation::Int32));
        assert_eq!(rep("bigint"), Some(TypeRepresentation::Int64));
    }

    #[test]
    fn test_numeric_precision_boundaries() {
        assert_eq!(rep("numeric(2,0)"), Some(TypeRepresentation::Int8));
        assert_eq!(rep("numeric(4)"), Some(TypeRepresentation::Int16));
        assert_eq!(rep("numeric(9, 0)"), Some(TypeRepresentation::Int32));
        assert_eq!(rep("decimal(18,0)"), Some(TypeRepresentation::Int64));
        assert_eq!(rep("numeric(19,0)"), Some(TypeRepresentation::BigInteger));
        assert_eq!(rep("numeric(4,2)"), Some(TypeRepresentation::BigDecimal));
        assert_eq!(rep("numeric(38,1)"), Some(TypeRepresentation::BigDecimal));
    }

    #[test]
    fn test_unconstrained_numeric() {
        let ty = PostgresColumnType::parse("numeric");

        assert_eq!(
            ty,
            PostgresColumnType::Numeric {
                precision: None,
                scale: 0
            }
        );
        assert_eq!(ty.representation(), Some(TypeRepresentation::BigDecimal));
        assert_eq!(ty.cast_type(), CastType::String);
    }

    #[test]
    fn test_parse_with_time_zone() {
        assert_eq!(
            PostgresColumnType::parse("timestamp(3) with time zone"),
            PostgresColumnType::TimestampTz
        );
        assert_eq!(
            PostgresColumnType::parse("time without time zone"),
            PostgresColumnType::Time
        );
        assert_eq!(
            PostgresColumnType::parse("interval day to second"),
            PostgresColumnType::Interval
        );
    }

    #[test]
    fn test_parse_varchar_with_length() {
        let ty = PostgresColumnType::parse("character varying(255)");

        assert_eq!(ty, PostgresColumnType::Varchar);
        assert!(ty.comparison_operators().contains(&ComparisonOperator::IRegex));
        assert_eq!(ty.aggregate_functions(), vec!["min", "max"]);
    }

    #[test]
    fn test_parse_arrays() {
        let ty = PostgresColumnType::parse("integer[]");

        assert_eq!(
            ty,
            PostgresColumnType::Array(Box::new(PostgresColumnType::Integer))
        );
        assert_eq!(ty.type_name(), "INTEGER[]");
        assert_eq!(ty.scalar_type_name(), "INTEGER_ARRAY");
        assert_eq!(ty.representation(), Some(TypeRepresentation::JSON));
        assert_eq!(ty.cast_type(), CastType::Json);
        assert_eq!(
            PostgresColumnType::parse("text ARRAY"),
            PostgresColumnType::Array(Box::new(PostgresColumnType::Text))
        );
    }

    #[test]
    fn test_string_like_types_cast_to_text() {
        for ty in ["uuid", "time", "timetz", "interval"] {
            let ty = PostgresColumnType::parse(ty);
            assert_eq!(ty.cast_type(), CastType::String, "{:?}", ty);
            assert!(!ty.comparison_operators().contains(&ComparisonOperator::Like));
        }
    }

    #[test]
    fn test_uuid_has_no_aggregates() {
        assert!(PostgresColumnType::parse("uuid")
            .aggregate_functions()
            .is_empty());
    }

    #[test]
    fn test_geo_types() {
        assert_eq!(
            PostgresColumnType::parse("geometry").cast_type(),
            CastType::GeoJson
        );
        assert_eq!(rep("geography"), Some(TypeRepresentation::Geography));
    }

    #[test]
    fn test_unknown_type() {
        let ty = PostgresColumnType::parse("tsvector");

        assert_eq!(ty, PostgresColumnType::Unknown("tsvector".into()));
        assert_eq!(ty.representation(), None);
        assert_eq!(
            ty.comparison_operators(),
            vec![
                ComparisonOperator::Eq,
                ComparisonOperator::Neq,
                ComparisonOperator::In
            ]
        );
        assert!(ty.aggregate_functions().is_empty());
        assert_eq!(ty.cast_type(), CastType::None);
    }

    #[test]
    fn test_numeric_aggregates() {
        assert_eq!(
            PostgresColumnType::parse("integer").aggregate_functions(),
            STANDARD_NUMERIC_AGGREGATES.to_vec()
        );
    }
}
