use stratum_connectors_base::{
    common::CastType,
    interface::{ColumnType, Dialect},
};
use stratum_core::err::{ensure, Result};

use crate::DatabricksColumnType;

/// The Databricks SQL dialect
pub struct DatabricksDialect;

impl Dialect for DatabricksDialect {
    type TColumnType = DatabricksColumnType;

    const TYPE: &'static str = "databricks";

    fn compile_identifier(name: &str) -> Result<String> {
        ensure!(
            !name.contains('\0'),
            "Identifier cannot contain null byte: {:?}",
            name
        );

        Ok(format!("`{}`", name.replace('`', "``")))
    }

    /// Spark treats backslashes in literals as escapes
    fn compile_string_literal(value: &str) -> Result<String> {
        ensure!(
            !value.contains('\0'),
            "String literal cannot contain null byte: {:?}",
            value
        );

        Ok(format!(
            "'{}'",
            value.replace('\\', "\\\\").replace('\'', "\\'")
        ))
    }

    fn compile_cast(expr: String, column_type: &Self::TColumnType) -> String {
        match column_type.cast_type() {
            CastType::None => expr,
            CastType::String => format!("CAST({} AS STRING)", expr),
            CastType::GeoJson => format!("ST_ASGEOJSON({})", expr),
            CastType::Json => format!("TO_JSON({})", expr),
        }
    }

    fn compile_regex_comparison(
        field: &str,
        pattern: &str,
        case_insensitive: bool,
        negated: bool,
    ) -> Result<String> {
        let pattern = if case_insensitive {
            format!("CONCAT('(?i)', {})", pattern)
        } else {
            pattern.to_string()
        };

        Ok(format!(
            "{}{} RLIKE {}",
            if negated { "NOT " } else { "" },
            field,
            pattern
        ))
    }
}
