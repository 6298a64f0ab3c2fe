use stratum_connectors_base::{
    common::{
        default_cast_type, default_comparison_operators, numeric_representation, CastType,
        TypeName,
    },
    interface::ColumnType,
};
use stratum_core::proto::{ComparisonOperator, TypeRepresentation};

/// Phoenix column types.
///
/// The unsigned variants share the representation of their signed
/// counterparts, they only differ in their on-disk sort order.
#[derive(Debug, Clone, PartialEq)]
pub enum PhoenixColumnType {
    TinyInt { unsigned: bool },
    SmallInt { unsigned: bool },
    Integer { unsigned: bool },
    BigInt { unsigned: bool },
    Float { unsigned: bool },
    Double { unsigned: bool },
    Decimal { precision: Option<u32>, scale: u32 },
    Boolean,
    Time { unsigned: bool },
    Date { unsigned: bool },
    Timestamp { unsigned: bool },
    Varchar,
    Char,
    Binary,
    Varbinary,
    Array(Box<PhoenixColumnType>),
    Unknown(String),
}

impl ColumnType for PhoenixColumnType {
    const STRING_OPERATORS: &'static [ComparisonOperator] = &[
        ComparisonOperator::Like,
        ComparisonOperator::NLike,
        ComparisonOperator::ILike,
        ComparisonOperator::NILike,
    ];

    const NUMERIC_AGGREGATES: &'static [&'static str] =
        &["avg", "sum", "min", "max", "stddev_pop", "stddev_samp"];

    fn parse(type_name: &str) -> Self {
        let text = type_name.trim();

        if let Some(inner) = text
            .strip_suffix("[]")
            .or_else(|| strip_suffix_ignore_case(text, " ARRAY"))
        {
            return Self::Array(Box::new(Self::parse(inner)));
        }

        let ty = TypeName::parse(text);
        let (name, unsigned) = match ty.name.strip_prefix("UNSIGNED_") {
            Some(name) => (name, true),
            None => (ty.name.as_str(), false),
        };

        match name {
            "TINYINT" => Self::TinyInt { unsigned },
            "SMALLINT" => Self::SmallInt { unsigned },
            "INTEGER" | "INT" => Self::Integer { unsigned },
            "BIGINT" | "LONG" => Self::BigInt { unsigned },
            "FLOAT" => Self::Float { unsigned },
            "DOUBLE" => Self::Double { unsigned },
            "DECIMAL" if !unsigned => match ty.arg_u32(0) {
                Some(precision) => Self::Decimal {
                    precision: Some(precision),
                    scale: ty.arg_u32(1).unwrap_or(0),
                },
                None => Self::Decimal {
                    precision: None,
                    scale: 0,
                },
            },
            "BOOLEAN" if !unsigned => Self::Boolean,
            "TIME" => Self::Time { unsigned },
            "DATE" => Self::Date { unsigned },
            "TIMESTAMP" => Self::Timestamp { unsigned },
            "VARCHAR" if !unsigned => Self::Varchar,
            "CHAR" if !unsigned => Self::Char,
            "BINARY" if !unsigned => Self::Binary,
            "VARBINARY" if !unsigned => Self::Varbinary,
            _ => Self::Unknown(text.to_string()),
        }
    }

    fn type_name(&self) -> String {
        let prefixed = |unsigned: bool, name: &str| {
            if unsigned {
                format!("UNSIGNED_{}", name)
            } else {
                name.to_string()
            }
        };

        match self {
            Self::TinyInt { unsigned } => prefixed(*unsigned, "TINYINT"),
            Self::SmallInt { unsigned } => prefixed(*unsigned, "SMALLINT"),
            Self::Integer { unsigned } => prefixed(*unsigned, "INTEGER"),
            Self::BigInt { unsigned } => prefixed(*unsigned, "BIGINT"),
            Self::Float { unsigned } => prefixed(*unsigned, "FLOAT"),
            Self::Double { unsigned } => prefixed(*unsigned, "DOUBLE"),
            Self::Decimal {
                precision: Some(precision),
                scale,
            } => format!("DECIMAL({},{})", precision, scale),
            Self::Decimal {
                precision: None, ..
            } => "DECIMAL".into(),
            Self::Boolean => "BOOLEAN".into(),
            Self::Time { unsigned } => prefixed(*unsigned, "TIME"),
            Self::Date { unsigned } => prefixed(*unsigned, "DATE"),
            Self::Timestamp { unsigned } => prefixed(*unsigned, "TIMESTAMP"),
            Self::Varchar => "VARCHAR".into(),
            Self::Char => "CHAR".into(),
            Self::Binary => "BINARY".into(),
            Self::Varbinary => "VARBINARY".into(),
            Self::Array(inner) => format!("{} ARRAY", inner.type_name()),
            Self::Unknown(name) => name.clone(),
        }
    }

    fn representation(&self) -> Option<TypeRepresentation> {
        Some(match self {
            Self::TinyInt { .. } => TypeRepresentation::Int8,
            Self::SmallInt { .. } => TypeRepresentation::Int16,
            Self::Integer { .. } => TypeRepresentation::Int32,
            Self::BigInt { .. } => TypeRepresentation::Int64,
            Self::Float { .. } => TypeRepresentation::Float32,
            Self::Double { .. } => TypeRepresentation::Float64,
            Self::Decimal {
                precision: Some(precision),
                scale,
            } => numeric_representation(*precision, *scale),
            Self::Decimal {
                precision: None, ..
            } => TypeRepresentation::BigDecimal,
            Self::Boolean => TypeRepresentation::Boolean,
            Self::Varchar | Self::Char | Self::Time { .. } => TypeRepresentation::String,
            Self::Date { .. } => TypeRepresentation::Date,
            Self::Timestamp { .. } => TypeRepresentation::Timestamp,
            Self::Binary | Self::Varbinary => TypeRepresentation::Bytes,
            Self::Array(_) => TypeRepresentation::JSON,
            Self::Unknown(_) => return None,
        })
    }

    fn cast_type(&self) -> CastType {
        match self {
            Self::Time { .. } => CastType::String,
            _ => default_cast_type(self.representation()),
        }
    }

    fn comparison_operators(&self) -> Vec<ComparisonOperator> {
        default_comparison_operators(
            self.representation(),
            match self {
                Self::Varchar | Self::Char => Self::STRING_OPERATORS,
                _ => &[],
            },
        )
    }
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;

    if text.is_char_boundary(split) && text[split..].eq_ignore_ascii_case(suffix) {
        Some(&text[..split])
    } else {
        None
    }
}
