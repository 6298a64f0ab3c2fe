use stratum_connectors_base::{
    common::{
        default_cast_type, default_comparison_operators, numeric_representation, split_field,
        CastType, TypeName, EXTENDED_NUMERIC_AGGREGATES,
    },
    interface::ColumnType,
};
use stratum_core::proto::{ComparisonOperator, TypeRepresentation};

/// Databricks (Spark SQL) column types
#[derive(Debug, Clone, PartialEq)]
pub enum DatabricksColumnType {
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Decimal { precision: u32, scale: u32 },
    Float,
    Double,
    String,
    Binary,
    Boolean,
    Date,
    Timestamp,
    TimestampNtz,
    Interval,
    Array(Box<DatabricksColumnType>),
    Map(Box<DatabricksColumnType>, Box<DatabricksColumnType>),
    Struct(Vec<(String, DatabricksColumnType)>),
    Variant,
    Unknown(String),
}

impl DatabricksColumnType {
    fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Array(_) | Self::Map(_, _) | Self::Struct(_) | Self::Variant
        )
    }
}

impl ColumnType for DatabricksColumnType {
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
        let arg = |idx: usize| {
            Box::new(
                ty.args
                    .get(idx)
                    .map(|a| Self::parse(a))
                    .unwrap_or_else(|| Self::Unknown(String::new())),
            )
        };

        match ty.name.as_str() {
            "TINYINT" | "BYTE" => Self::TinyInt,
            "SMALLINT" | "SHORT" => Self::SmallInt,
            "INT" | "INTEGER" => Self::Int,
            "BIGINT" | "LONG" => Self::BigInt,
            "DECIMAL" | "DEC" | "NUMERIC" => {
                let (precision, scale) = ty.precision_scale(10, 0);
                Self::Decimal { precision, scale }
            }
            "FLOAT" | "REAL" => Self::Float,
            "DOUBLE" => Self::Double,
            "STRING" | "VARCHAR" | "CHAR" => Self::String,
            "BINARY" => Self::Binary,
            "BOOLEAN" => Self::Boolean,
            "DATE" => Self::Date,
            "TIMESTAMP" | "TIMESTAMP_LTZ" => Self::Timestamp,
            "TIMESTAMP_NTZ" => Self::TimestampNtz,
            "VARIANT" => Self::Variant,
            "ARRAY" => Self::Array(arg(0)),
            "MAP" => Self::Map(arg(0), arg(1)),
            "STRUCT" => Self::Struct(
                ty.args
                    .iter()
                    .map(|f| {
                        let (name, ty) = split_field(f);
                        (name, Self::parse(&ty))
                    })
                    .collect(),
            ),
            name if name.starts_with("INTERVAL") => Self::Interval,
            _ => Self::Unknown(type_name.trim().to_string()),
        }
    }

    fn type_name(&self) -> String {
        match self {
            Self::TinyInt => "TINYINT".into(),
            Self::SmallInt => "SMALLINT".into(),
            Self::Int => "INT".into(),
            Self::BigInt => "BIGINT".into(),
            Self::Decimal { precision, scale } => format!("DECIMAL({},{})", precision, scale),
            Self::Float => "FLOAT".into(),
            Self::Double => "DOUBLE".into(),
            Self::String => "STRING".into(),
            Self::Binary => "BINARY".into(),
            Self::Boolean => "BOOLEAN".into(),
            Self::Date => "DATE".into(),
            Self::Timestamp => "TIMESTAMP".into(),
            Self::TimestampNtz => "TIMESTAMP_NTZ".into(),
            Self::Interval => "INTERVAL".into(),
            Self::Array(inner) => format!("ARRAY<{}>", inner.type_name()),
            Self::Map(key, value) => format!("MAP<{},{}>", key.type_name(), value.type_name()),
            Self::Struct(fields) => format!(
                "STRUCT<{}>",
                fields
                    .iter()
                    .map(|(name, ty)| format!("{}:{}", name, ty.type_name()))
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            Self::Variant => "VARIANT".into(),
            Self::Unknown(name) => name.clone(),
        }
    }

    fn representation(&self) -> Option<TypeRepresentation> {
        Some(match self {
            Self::TinyInt => TypeRepresentation::Int8,
            Self::SmallInt => TypeRepresentation::Int16,
            Self::Int => TypeRepresentation::Int32,
            Self::BigInt => TypeRepresentation::Int64,
            Self::Decimal { precision, scale } => numeric_representation(*precision, *scale),
            Self::Float => TypeRepresentation::Float32,
            Self::Double => TypeRepresentation::Float64,
            Self::String | Self::Interval => TypeRepresentation::String,
            Self::Binary => TypeRepresentation::Bytes,
            Self::Boolean => TypeRepresentation::Boolean,
            Self::Date => TypeRepresentation::Date,
            Self::Timestamp => TypeRepresentation::TimestampTZ,
            Self::TimestampNtz => TypeRepresentation::Timestamp,
            Self::Array(_) | Self::Map(_, _) | Self::Struct(_) | Self::Variant => {
                TypeRepresentation::JSON
            }
            Self::Unknown(_) => return None,
        })
    }

    fn cast_type(&self) -> CastType {
        match self {
            Self::Interval => CastType::String,
            ty if ty.is_composite() => CastType::Json,
            _ => default_cast_type(self.representation()),
        }
    }

    fn comparison_operators(&self) -> Vec<ComparisonOperator> {
        default_comparison_operators(
            self.representation(),
            match self {
                Self::String => Self::STRING_OPERATORS,
                _ => &[],
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rep(ty: &str) -> Option<TypeRepresentation> {
        DatabricksColumnType::parse(ty).representation()
    }

    #[test]
    fn test_integers() {
        assert_eq!(rep("tinyint"), Some(TypeRepresentation::Int8));
        assert_eq!(rep("SHORT"), Some(TypeRepresentation::Int16));
        assert_eq!(rep("int"), Some(TypeRepresentation::Int32));
        assert_eq!(rep("LONG"), Some(TypeRepresentation::Int64));
        assert_eq!(
            DatabricksColumnType::parse("bigint").cast_type(),
            CastType::String
        );
        assert_eq!(DatabricksColumnType::parse("int").cast_type(), CastType::None);
    }

    #[test]
    fn test_decimal_defaults() {
        assert_eq!(
            DatabricksColumnType::parse("decimal"),
            DatabricksColumnType::Decimal {
                precision: 10,
                scale: 0
            }
        );
        assert_eq!(rep("decimal"), Some(TypeRepresentation::Int64));
        assert_eq!(rep("decimal(10,2)"), Some(TypeRepresentation::BigDecimal));
        assert_eq!(rep("DEC(4)"), Some(TypeRepresentation::Int16));
    }

    #[test]
    fn test_decimal_precision_boundaries() {
        assert_eq!(rep("DECIMAL(2,0)"), Some(TypeRepresentation::Int8));
        assert_eq!(rep("DECIMAL(4,0)"), Some(TypeRepresentation::Int16));
        assert_eq!(rep("DECIMAL(9,0)"), Some(TypeRepresentation::Int32));
        assert_eq!(rep("DECIMAL(18,0)"), Some(TypeRepresentation::Int64));
        assert_eq!(rep("DECIMAL(19,0)"), Some(TypeRepresentation::BigInteger));
        assert_eq!(rep("NUMERIC(3,1)"), Some(TypeRepresentation::BigDecimal));
        assert_eq!(rep("DECIMAL(38,10)"), Some(TypeRepresentation::BigDecimal));
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(rep("timestamp"), Some(TypeRepresentation::TimestampTZ));
        assert_eq!(rep("timestamp_ntz"), Some(TypeRepresentation::Timestamp));
        assert_eq!(
            DatabricksColumnType::parse("INTERVAL DAY TO SECOND"),
            DatabricksColumnType::Interval
        );
        assert_eq!(
            DatabricksColumnType::Interval.cast_type(),
            CastType::String
        );
    }

    #[test]
    fn test_composite_types() {
        let ty = DatabricksColumnType::parse("map<string,array<struct<a:int,b:string>>>");

        assert_eq!(
            ty,
            DatabricksColumnType::Map(
                Box::new(DatabricksColumnType::String),
                Box::new(DatabricksColumnType::Array(Box::new(
                    DatabricksColumnType::Struct(vec![
                        ("a".into(), DatabricksColumnType::Int),
                        ("b".into(), DatabricksColumnType::String),
                    ])
                )))
            )
        );
        assert_eq!(ty.type_name(), "MAP<STRING,ARRAY<STRUCT<a:INT,b:STRING>>>");
        assert_eq!(ty.scalar_type_name(), "MAP_STRING_ARRAY_STRUCT_a_INT_b_STRING");
        assert_eq!(ty.representation(), Some(TypeRepresentation::JSON));
        assert_eq!(ty.cast_type(), CastType::Json);
        assert_eq!(
            ty.comparison_operators(),
            vec![
                ComparisonOperator::Eq,
                ComparisonOperator::Neq,
                ComparisonOperator::In
            ]
        );
        assert!(ty.aggregate_functions().is_empty());
        assert_eq!(
            DatabricksColumnType::parse("VARIANT").cast_type(),
            CastType::Json
        );
    }

    #[test]
    fn test_string_operators() {
        let ops = DatabricksColumnType::parse("varchar(10)").comparison_operators();

        assert!(ops.contains(&ComparisonOperator::IRegex));
        assert!(!DatabricksColumnType::Date
            .comparison_operators()
            .contains(&ComparisonOperator::Like));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            DatabricksColumnType::parse("void"),
            DatabricksColumnType::Unknown("void".into())
        );
        assert_eq!(rep("void"), None);
    }
}
