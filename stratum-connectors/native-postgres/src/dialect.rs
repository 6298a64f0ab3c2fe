use stratum_connectors_base::{
    common::{CastType, ScalarLiteral},
    interface::{ColumnType, Dialect},
};
use stratum_core::err::Result;

use crate::PostgresColumnType;

/// The Postgres SQL dialect
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    type TColumnType = PostgresColumnType;

    const TYPE: &'static str = "postgres";

    /// Variables are typed as their correlated column, postgres would
    /// otherwise resolve string literals in the CTE to text
    fn compile_variable_literal(
        value: &ScalarLiteral,
        column_type: &Self::TColumnType,
    ) -> Result<String> {
        let literal = Self::compile_literal(value)?;

        Ok(match column_type {
            PostgresColumnType::Unknown(_) => literal,
            ty if ty.is_text() => literal,
            ty => format!("CAST({} AS {})", literal, ty.type_name()),
        })
    }

    fn compile_cast(expr: String, column_type: &Self::TColumnType) -> String {
        match column_type.cast_type() {
            CastType::None => expr,
            CastType::String => format!("CAST({} AS TEXT)", expr),
            CastType::GeoJson => format!("ST_AsGeoJSON({})", expr),
            CastType::Json => format!("TO_JSON({})", expr),
        }
    }

    fn compile_regex_comparison(
        field: &str,
        pattern: &str,
        case_insensitive: bool,
        negated: bool,
    ) -> Result<String> {
        let op = match (negated, case_insensitive) {
            (false, false) => "~",
            (true, false) => "!~",
            (false, true) => "~*",
            (true, true) => "!~*",
        };

        Ok(format!("{} {} {}", field, op, pattern))
    }
}
