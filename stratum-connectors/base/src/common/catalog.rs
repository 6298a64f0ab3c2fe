//! Policy shared by every dialect's type catalog: how representations map to
//! casts, operators and aggregate functions.

use stratum_core::proto::{ComparisonOperator, TypeRepresentation};

/// How a column is cast when it is projected, so its values survive transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastType {
    /// Projected as is
    None,
    /// Cast to the dialect's string type, eg 64-bit integers which would lose
    /// precision as json numbers
    String,
    /// Rendered as a GeoJSON document
    GeoJson,
    /// Rendered as json text
    Json,
}

/// Numeric aggregates supported by every dialect
pub const STANDARD_NUMERIC_AGGREGATES: &[&str] = &[
    "avg",
    "sum",
    "min",
    "max",
    "stddev_pop",
    "stddev_samp",
    "var_pop",
    "var_samp",
];

/// [`STANDARD_NUMERIC_AGGREGATES`] with `any_value`
pub const EXTENDED_NUMERIC_AGGREGATES: &[&str] = &[
    "avg",
    "sum",
    "min",
    "max",
    "stddev_pop",
    "stddev_samp",
    "var_pop",
    "var_samp",
    "any_value",
];

/// Aggregates legal on strings and temporal types
pub const ORDERED_AGGREGATES: &[&str] = &["min", "max"];

/// Aggregates whose result is a floating point number regardless of the
/// column type
pub const FLOAT_AGGREGATES: &[&str] = &["avg", "stddev_pop", "stddev_samp", "var_pop", "var_samp"];

/// The representation of a fixed point number.
///
/// Any fractional digits make it a decimal, otherwise the narrowest integer
/// which holds `precision` digits.
pub fn numeric_representation(precision: u32, scale: u32) -> TypeRepresentation {
    if scale > 0 {
        return TypeRepresentation::BigDecimal;
    }

    match precision {
        0..=2 => TypeRepresentation::Int8,
        3..=4 => TypeRepresentation::Int16,
        5..=9 => TypeRepresentation::Int32,
        10..=18 => TypeRepresentation::Int64,
        _ => TypeRepresentation::BigInteger,
    }
}

pub fn default_cast_type(rep: Option<TypeRepresentation>) -> CastType {
    match rep {
        Some(TypeRepresentation::Int64)
        | Some(TypeRepresentation::BigInteger)
        | Some(TypeRepresentation::BigDecimal) => CastType::String,
        Some(TypeRepresentation::Geography) | Some(TypeRepresentation::Geometry) => {
            CastType::GeoJson
        }
        _ => CastType::None,
    }
}

pub fn default_comparison_operators(
    rep: Option<TypeRepresentation>,
    string_operators: &[ComparisonOperator],
) -> Vec<ComparisonOperator> {
    use ComparisonOperator::*;

    let mut ops = vec![Eq, Neq, In];

    match rep {
        Some(rep) if rep.is_numeric() || rep.is_temporal() => {
            ops.extend([Gt, Lt, Gte, Lte]);
        }
        Some(TypeRepresentation::String) => {
            ops.extend([Gt, Lt, Gte, Lte]);
            ops.extend(string_operators.iter().copied());
        }
        _ => {}
    }

    ops
}

pub fn default_aggregate_functions(
    rep: Option<TypeRepresentation>,
    numeric_aggregates: &'static [&'static str],
) -> Vec<&'static str> {
    match rep {
        Some(rep) if rep.is_numeric() => numeric_aggregates.to_vec(),
        Some(rep) if rep.is_temporal() => ORDERED_AGGREGATES.to_vec(),
        Some(TypeRepresentation::String) => ORDERED_AGGREGATES.to_vec(),
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_numeric_representation_precision_boundaries() {
        assert_eq!(numeric_representation(2, 0), TypeRepresentation::Int8);
        assert_eq!(numeric_representation(3, 0), TypeRepresentation::Int16);
        assert_eq!(numeric_representation(4, 0), TypeRepresentation::Int16);
        assert_eq!(numeric_representation(9, 0), TypeRepresentation::Int32);
        assert_eq!(numeric_representation(10, 0), TypeRepresentation::Int64);
        assert_eq!(numeric_representation(18, 0), TypeRepresentation::Int64);
        assert_eq!(numeric_representation(19, 0), TypeRepresentation::BigInteger);
        assert_eq!(numeric_representation(38, 0), TypeRepresentation::BigInteger);
    }

    #[test]
    fn test_numeric_representation_nonzero_scale() {
        assert_eq!(numeric_representation(2, 1), TypeRepresentation::BigDecimal);
        assert_eq!(numeric_representation(18, 2), TypeRepresentation::BigDecimal);
        assert_eq!(numeric_representation(38, 37), TypeRepresentation::BigDecimal);
    }

    #[test]
    fn test_default_cast_type() {
        assert_eq!(default_cast_type(Some(TypeRepresentation::Int32)), CastType::None);
        assert_eq!(default_cast_type(Some(TypeRepresentation::Int64)), CastType::String);
        assert_eq!(
            default_cast_type(Some(TypeRepresentation::BigDecimal)),
            CastType::String
        );
        assert_eq!(
            default_cast_type(Some(TypeRepresentation::Geography)),
            CastType::GeoJson
        );
        assert_eq!(default_cast_type(Some(TypeRepresentation::JSON)), CastType::None);
        assert_eq!(default_cast_type(None), CastType::None);
    }

    #[test]
    fn test_default_comparison_operators() {
        use ComparisonOperator::*;

        assert_eq!(default_comparison_operators(None, &[Like]), vec![Eq, Neq, In]);
        assert_eq!(
            default_comparison_operators(Some(TypeRepresentation::Boolean), &[Like]),
            vec![Eq, Neq, In]
        );
        assert_eq!(
            default_comparison_operators(Some(TypeRepresentation::Date), &[Like]),
            vec![Eq, Neq, In, Gt, Lt, Gte, Lte]
        );
        assert_eq!(
            default_comparison_operators(Some(TypeRepresentation::String), &[Like, ILike]),
            vec![Eq, Neq, In, Gt, Lt, Gte, Lte, Like, ILike]
        );
    }

    #[test]
    fn test_default_aggregate_functions() {
        assert_eq!(
            default_aggregate_functions(
                Some(TypeRepresentation::Float64),
                STANDARD_NUMERIC_AGGREGATES
            ),
            STANDARD_NUMERIC_AGGREGATES.to_vec()
        );
        assert_eq!(
            default_aggregate_functions(Some(TypeRepresentation::Timestamp), &[]),
            vec!["min", "max"]
        );
        assert_eq!(
            default_aggregate_functions(Some(TypeRepresentation::String), &[]),
            vec!["min", "max"]
        );
        assert!(default_aggregate_functions(
            Some(TypeRepresentation::Boolean),
            STANDARD_NUMERIC_AGGREGATES
        )
        .is_empty());
        assert!(default_aggregate_functions(None, STANDARD_NUMERIC_AGGREGATES).is_empty());
    }
}
