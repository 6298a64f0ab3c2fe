use stratum_connectors_base::{
    common::CastType,
    interface::{ColumnType, Dialect},
};
use stratum_core::err::{ensure, Result};

use crate::BigQueryColumnType;

/// The BigQuery (GoogleSQL) dialect
pub struct BigQueryDialect;

impl Dialect for BigQueryDialect {
    type TColumnType = BigQueryColumnType;

    const TYPE: &'static str = "bigquery";

    fn compile_identifier(name: &str) -> Result<String> {
        ensure!(
            !name.contains('\0'),
            "Identifier cannot contain null byte: {:?}",
            name
        );

        Ok(format!(
            "`{}`",
            name.replace('\\', "\\\\").replace('`', "\\`")
        ))
    }

    fn compile_string_literal(value: &str) -> Result<String> {
        ensure!(
            !value.contains('\0'),
            "String literal cannot contain null byte: {:?}",
            value
        );

        Ok(format!(
            "'{}'",
            value
                .replace('\\', "\\\\")
                .replace('\'', "\\'")
                .replace('\n', "\\n")
                .replace('\r', "\\r")
        ))
    }

    fn compile_cast(expr: String, column_type: &Self::TColumnType) -> String {
        match column_type.cast_type() {
            CastType::None => expr,
            CastType::String => format!("CAST({} AS STRING)", expr),
            CastType::GeoJson => format!("ST_ASGEOJSON({})", expr),
            CastType::Json => format!("TO_JSON_STRING({})", expr),
        }
    }

    fn compile_like_comparison(
        field: &str,
        pattern: &str,
        case_insensitive: bool,
        negated: bool,
    ) -> Result<String> {
        let not = if negated { "NOT " } else { "" };

        Ok(if case_insensitive {
            format!("LOWER({}) {}LIKE LOWER({})", field, not, pattern)
        } else {
            format!("{} {}LIKE {}", field, not, pattern)
        })
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
            "{}REGEXP_CONTAINS({}, {})",
            if negated { "NOT " } else { "" },
            field,
            pattern
        ))
    }

    /// An offset requires a limit
    fn compile_limit_offset(limit: Option<u32>, offset: Option<u32>) -> String {
        match (limit, offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("LIMIT {} OFFSET {}", i64::MAX, o),
            (None, None) => "".into(),
        }
    }
}
