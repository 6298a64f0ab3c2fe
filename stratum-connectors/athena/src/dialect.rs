use stratum_connectors_base::{
    common::CastType,
    interface::{ColumnType, Dialect},
};
use stratum_core::err::Result;

use crate::AthenaColumnType;

/// The Athena (Trino) SQL dialect
pub struct AthenaDialect;

impl Dialect for AthenaDialect {
    type TColumnType = AthenaColumnType;

    const TYPE: &'static str = "athena";

    fn compile_cast(expr: String, column_type: &Self::TColumnType) -> String {
        match column_type.cast_type() {
            CastType::None => expr,
            CastType::String => format!("CAST({} AS VARCHAR)", expr),
            CastType::GeoJson => format!("TO_GEOJSON_GEOMETRY({})", expr),
            CastType::Json if column_type.is_composite() => {
                format!("JSON_FORMAT(CAST({} AS JSON))", expr)
            }
            CastType::Json => format!("JSON_FORMAT({})", expr),
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
            "{}REGEXP_LIKE({}, {})",
            if negated { "NOT " } else { "" },
            field,
            pattern
        ))
    }

    /// Trino expects the offset first
    fn compile_limit_offset(limit: Option<u32>, offset: Option<u32>) -> String {
        [
            offset.map(|o| format!("OFFSET {}", o)),
            limit.map(|l| format!("LIMIT {}", l)),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}
