use stratum_connectors_base::interface::Dialect;
use stratum_core::err::{ensure, Result};

use crate::SnowflakeColumnType;

/// The Snowflake SQL dialect
pub struct SnowflakeDialect;

impl Dialect for SnowflakeDialect {
    type TColumnType = SnowflakeColumnType;

    const TYPE: &'static str = "snowflake";

    /// Backslashes in single quoted literals are escapes
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

    fn compile_regex_comparison(
        field: &str,
        pattern: &str,
        case_insensitive: bool,
        negated: bool,
    ) -> Result<String> {
        Ok(format!(
            "{}REGEXP_LIKE({}, {}{})",
            if negated { "NOT " } else { "" },
            field,
            pattern,
            if case_insensitive { ", 'i'" } else { "" }
        ))
    }

    /// Snowflake requires a limit before an offset
    fn compile_limit_offset(limit: Option<u32>, offset: Option<u32>) -> String {
        match (limit, offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("LIMIT NULL OFFSET {}", o),
            (None, None) => "".into(),
        }
    }
}
