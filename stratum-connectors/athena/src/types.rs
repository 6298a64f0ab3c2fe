use stratum_connectors_base::{
    common::{
        default_cast_type, default_comparison_operators, numeric_representation, split_field,
        CastType, TypeName, STANDARD_NUMERIC_AGGREGATES,
    },
    interface::ColumnType,
};
use stratum_core::proto::{ComparisonOperator, TypeRepresentation};

/// Athena column types, as reported by the Glue catalog
#[derive(Debug, Clone, PartialEq)]
pub enum AthenaColumnType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Decimal { precision: u32, scale: u32 },
    Char,
    Varchar,
    Varbinary,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Json,
    Array(Box<AthenaColumnType>),
    Map(Box<AthenaColumnType>, Box<AthenaColumnType>),
    Row(Vec<(String, AthenaColumnType)>),
    Unknown(String),
}

impl AthenaColumnType {
    /// Whether the type is a container which must be cast to json to be
    /// rendered as text
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Map(_, _) | Self::Row(_))
    }
}

impl ColumnType for AthenaColumnType {
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
            "BOOLEAN" => Self::Boolean,
            "TINYINT" => Self::TinyInt,
            "SMALLINT" => Self::SmallInt,
            "INT" | "INTEGER" => Self::Integer,
            "BIGINT" => Self::BigInt,
            "REAL" | "FLOAT" => Self::Real,
            "DOUBLE" => Self::Double,
            "DECIMAL" => {
                let (precision, scale) = ty.precision_scale(38, 0);
                Self::Decimal { precision, scale }
            }
            "CHAR" => Self::Char,
            "VARCHAR" | "STRING" => Self::Varchar,
            "VARBINARY" | "BINARY" => Self::Varbinary,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "TIMESTAMP" => Self::Timestamp,
            "TIMESTAMP WITH TIME ZONE" => Self::TimestampTz,
            "JSON" => Self::Json,
            "ARRAY" => Self::Array(arg(0)),
            "MAP" => Self::Map(arg(0), arg(1)),
            "ROW" | "STRUCT" => Self::Row(
                ty.args
                    .iter()
                    .map(|f| {
                        let (name, ty) = split_field(f);
                        (name, Self::parse(&ty))
                    })
                    .collect(),
            ),
            _ => Self::Unknown(type_name.trim().to_string()),
        }
    }

    fn type_name(&self) -> String {
        match self {
            Self::Boolean => "BOOLEAN".into(),
            Self::TinyInt => "TINYINT".into(),
            Self::SmallInt => "SMALLINT".into(),
            Self::Integer => "INTEGER".into(),
            Self::BigInt => "BIGINT".into(),
            Self::Real => "REAL".into(),
            Self::Double => "DOUBLE".into(),
            Self::Decimal { precision, scale } => format!("DECIMAL({},{})", precision, scale),
            Self::Char => "CHAR".into(),
            Self::Varchar => "VARCHAR".into(),
            Self::Varbinary => "VARBINARY".into(),
            Self::Date => "DATE".into(),
            Self::Time => "TIME".into(),
            Self::Timestamp => "TIMESTAMP".into(),
            Self::TimestampTz => "TIMESTAMP WITH TIME ZONE".into(),
            Self::Json => "JSON".into(),
            Self::Array(inner) => format!("ARRAY<{}>", inner.type_name()),
            Self::Map(key, value) => format!("MAP<{},{}>", key.type_name(), value.type_name()),
            Self::Row(fields) => format!(
                "ROW({})",
                fields
                    .iter()
                    .map(|(name, ty)| format!("{} {}", name, ty.type_name()))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Unknown(name) => name.clone(),
        }
    }

    fn representation(&self) -> Option<TypeRepresentation> {
        Some(match self {
            Self::Boolean => TypeRepresentation::Boolean,
            Self::TinyInt => TypeRepresentation::Int8,
            Self::SmallInt => TypeRepresentation::Int16,
            Self::Integer => TypeRepresentation::Int32,
            Self::BigInt => TypeRepresentation::Int64,
            Self::Real => TypeRepresentation::Float32,
            Self::Double => TypeRepresentation::Float64,
            Self::Decimal { precision, scale } => numeric_representation(*precision, *scale),
            Self::Char | Self::Varchar | Self::Time => TypeRepresentation::String,
            Self::Varbinary => TypeRepresentation::Bytes,
            Self::Date => TypeRepresentation::Date,
            Self::Timestamp => TypeRepresentation::Timestamp,
            Self::TimestampTz => TypeRepresentation::TimestampTZ,
            Self::Json | Self::Array(_) | Self::Map(_, _) | Self::Row(_) => {
                TypeRepresentation::JSON
            }
            Self::Unknown(_) => return None,
        })
    }

    fn cast_type(&self) -> CastType {
        match self {
            Self::Time => CastType::String,
            Self::Json | Self::Array(_) | Self::Map(_, _) | Self::Row(_) => CastType::Json,
            _ => default_cast_type(self.representation()),
        }
    }

    fn comparison_operators(&self) -> Vec<ComparisonOperator> {
        default_comparison_operators(
            self.representation(),
            match self {
                Self::Char | Self::Varchar => Self::STRING_OPERATORS,
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
        AthenaColumnType::parse(ty).representation()
    }

    #[test]
    fn test_decimal_defaults() {
        assert_eq!(
            AthenaColumnType::parse("decimal"),
            AthenaColumnType::Decimal {
                precision: 38,
                scale: 0
            }
        );
        assert_eq!(rep("decimal"), Some(TypeRepresentation::BigInteger));
        assert_eq!(rep("decimal(12,4)"), Some(TypeRepresentation::BigDecimal));
        assert_eq!(rep("decimal(9,0)"), Some(TypeRepresentation::Int32));
    }

    #[test]
    fn test_decimal_precision_boundaries() {
        assert_eq!(rep("decimal(2,0)"), Some(TypeRepresentation::Int8));
        assert_eq!(rep("decimal(4,0)"), Some(TypeRepresentation::Int16));
        assert_eq!(rep("decimal(9,0)"), Some(TypeRepresentation::Int32));
        assert_eq!(rep("decimal(18,0)"), Some(TypeRepresentation::Int64));
        assert_eq!(rep("decimal(19,0)"), Some(TypeRepresentation::BigInteger));
        assert_eq!(rep("decimal(2,1)"), Some(TypeRepresentation::BigDecimal));
        assert_eq!(rep("decimal(38,37)"), Some(TypeRepresentation::BigDecimal));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(rep("int"), Some(TypeRepresentation::Int32));
        assert_eq!(rep("float"), Some(TypeRepresentation::Float32));
        assert_eq!(rep("string"), Some(TypeRepresentation::String));
        assert_eq!(rep("varchar(255)"), Some(TypeRepresentation::String));
        assert_eq!(rep("timestamp(3)"), Some(TypeRepresentation::Timestamp));
        assert_eq!(
            rep("timestamp(6) with time zone"),
            Some(TypeRepresentation::TimestampTZ)
        );
        assert_eq!(AthenaColumnType::Time.cast_type(), CastType::String);
        assert_eq!(
            AthenaColumnType::parse("bigint").cast_type(),
            CastType::String
        );
    }

    #[test]
    fn test_composite_types() {
        let ty = AthenaColumnType::parse("array<struct<name:string,qty:int>>");

        assert_eq!(
            ty,
            AthenaColumnType::Array(Box::new(AthenaColumnType::Row(vec![
                ("name".into(), AthenaColumnType::Varchar),
                ("qty".into(), AthenaColumnType::Integer),
            ])))
        );
        assert!(ty.is_composite());
        assert_eq!(ty.type_name(), "ARRAY<ROW(name VARCHAR, qty INTEGER)>");
        assert_eq!(ty.scalar_type_name(), "ARRAY_ROW_name_VARCHAR_qty_INTEGER");
        assert_eq!(ty.cast_type(), CastType::Json);
        assert!(ty.aggregate_functions().is_empty());

        let map = AthenaColumnType::parse("map(varchar, double)");
        assert_eq!(
            map,
            AthenaColumnType::Map(
                Box::new(AthenaColumnType::Varchar),
                Box::new(AthenaColumnType::Double)
            )
        );
    }

    #[test]
    fn test_json() {
        let ty = AthenaColumnType::parse("json");

        assert!(!ty.is_composite());
        assert_eq!(ty.representation(), Some(TypeRepresentation::JSON));
        assert_eq!(ty.cast_type(), CastType::Json);
    }

    #[test]
    fn test_aggregates() {
        assert!(!AthenaColumnType::Double
            .aggregate_functions()
            .contains(&"any_value"));
        assert_eq!(
            AthenaColumnType::Varchar.aggregate_functions(),
            vec!["min", "max"]
        );
    }
}
