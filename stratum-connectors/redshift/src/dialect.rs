use stratum_connectors_base::{
    common::{CastType, ScalarLiteral},
    interface::{ColumnType, Dialect},
};
use stratum_core::{
    err::{ensure, Result},
    not_supported,
};

use crate::RedshiftColumnType;

/// The Redshift SQL dialect
pub struct RedshiftDialect;

impl Dialect for RedshiftDialect {
    type TColumnType = RedshiftColumnType;

    const TYPE: &'static str = "redshift";

    /// Redshift reads backslashes in literals as escapes
    fn compile_string_literal(value: &str) -> Result<String> {
        ensure!(
            !value.contains('\0'),
            "String literal cannot contain null byte: {:?}",
            value
        );

        Ok(format!(
            "'{}'",
            value.replace('\\', "\\\\").replace('\'', "''")
        ))
    }

    /// Variables are typed as their correlated column, string literals in the
    /// CTE would otherwise be compared as text
    fn compile_variable_literal(
        value: &ScalarLiteral,
        column_type: &Self::TColumnType,
    ) -> Result<String> {
        use RedshiftColumnType as T;

        let literal = Self::compile_literal(value)?;

        Ok(match column_type {
            T::Unknown(_) | T::Super | T::HllSketch | T::Varbyte | T::Geometry | T::Geography => {
                literal
            }
            ty if ty.is_text() => literal,
            ty => format!("CAST({} AS {})", literal, ty.type_name()),
        })
    }

    fn compile_cast(expr: String, column_type: &Self::TColumnType) -> String {
        match column_type.cast_type() {
            CastType::None => expr,
            CastType::String => format!("CAST({} AS VARCHAR(MAX))", expr),
            CastType::GeoJson => format!("ST_ASGEOJSON({})", expr),
            CastType::Json => format!("JSON_SERIALIZE({})", expr),
        }
    }

    /// POSIX patterns, redshift has no case insensitive operator
    fn compile_regex_comparison(
        field: &str,
        pattern: &str,
        case_insensitive: bool,
        negated: bool,
    ) -> Result<String> {
        if case_insensitive {
            not_supported!("case insensitive regular expressions on {}", Self::TYPE);
        }

        Ok(format!(
            "{} {} {}",
            field,
            if negated { "!~" } else { "~" },
            pattern
        ))
    }
}
