use stratum_core::err::{ensure, Result};

use crate::common::{CastType, ScalarLiteral};

use super::ColumnType;

/// The SQL rendering rules of a warehouse.
///
/// The generic query planner is parameterised over a dialect and calls into
/// it wherever the warehouses disagree. Defaults follow ANSI SQL.
pub trait Dialect: Send + Sync + 'static {
    /// The type catalog of the dialect
    type TColumnType: ColumnType;

    /// The dialect type string, eg `snowflake`
    const TYPE: &'static str;

    /// Whether the warehouse supports the CTE and window functions used to
    /// compile queries batched over variables
    const SUPPORTS_VARIABLES: bool = true;

    /// Quotes an identifier
    fn compile_identifier(name: &str) -> Result<String> {
        ensure!(
            !name.contains('\0'),
            "Identifier cannot contain null byte: {:?}",
            name
        );

        Ok(format!("\"{}\"", name.replace('"', "\"\"")))
    }

    /// Renders a string literal
    fn compile_string_literal(value: &str) -> Result<String> {
        ensure!(
            !value.contains('\0'),
            "String literal cannot contain null byte: {:?}",
            value
        );

        Ok(format!("'{}'", value.replace('\'', "''")))
    }

    fn compile_bool_literal(value: bool) -> String {
        match value {
            true => "TRUE".to_string(),
            false => "FALSE".to_string(),
        }
    }

    /// Renders a scalar literal, lists are only valid as the operand of `IN`
    fn compile_literal(value: &ScalarLiteral) -> Result<String> {
        Ok(match value {
            ScalarLiteral::Null => "NULL".to_string(),
            ScalarLiteral::Integer(i) => i.to_string(),
            ScalarLiteral::Float(f) => f.to_string(),
            ScalarLiteral::Boolean(b) => Self::compile_bool_literal(*b),
            ScalarLiteral::String(s) => Self::compile_string_literal(s)?,
            ScalarLiteral::List(items) => items
                .iter()
                .map(Self::compile_literal)
                .collect::<Result<Vec<_>>>()?
                .join(", "),
        })
    }

    /// Renders the value of a variable in the variables CTE, where it is
    /// compared against a column of the given type
    fn compile_variable_literal(
        value: &ScalarLiteral,
        _column_type: &Self::TColumnType,
    ) -> Result<String> {
        Self::compile_literal(value)
    }

    /// Wraps a projected column in the cast its type requires
    fn compile_cast(expr: String, column_type: &Self::TColumnType) -> String {
        match column_type.cast_type() {
            CastType::None => expr,
            CastType::String => format!("CAST({} AS VARCHAR)", expr),
            CastType::GeoJson => format!("ST_ASGEOJSON({})", expr),
            CastType::Json => format!("TO_JSON({})", expr),
        }
    }

    /// Renders a LIKE condition
    fn compile_like_comparison(
        field: &str,
        pattern: &str,
        case_insensitive: bool,
        negated: bool,
    ) -> Result<String> {
        Ok(format!(
            "{} {}{} {}",
            field,
            if negated { "NOT " } else { "" },
            if case_insensitive { "ILIKE" } else { "LIKE" },
            pattern
        ))
    }

    /// Renders a regular expression condition
    fn compile_regex_comparison(
        _field: &str,
        _pattern: &str,
        _case_insensitive: bool,
        _negated: bool,
    ) -> Result<String> {
        stratum_core::not_supported!("regular expression comparisons on {}", Self::TYPE)
    }

    /// Renders the pagination clause, empty if neither are set
    fn compile_limit_offset(limit: Option<u32>, offset: Option<u32>) -> String {
        [
            limit.map(|l| format!("LIMIT {}", l)),
            offset.map(|o| format!("OFFSET {}", o)),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Renders a call to an aggregate function already checked to be legal
    /// on the column type
    fn compile_aggregate_function(function: &str, arg: &str) -> Result<String> {
        Ok(format!("{}({})", function.to_uppercase(), arg))
    }
}
