use stratum_connectors_base::interface::Dialect;

use crate::PhoenixColumnType;

/// The Apache Phoenix SQL dialect.
///
/// Phoenix lacks the window functions used to batch queries over
/// variables, such requests are rejected.
pub struct PhoenixDialect;

impl Dialect for PhoenixDialect {
    type TColumnType = PhoenixColumnType;

    const TYPE: &'static str = "phoenix";

    const SUPPORTS_VARIABLES: bool = false;
}
