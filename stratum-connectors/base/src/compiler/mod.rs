//! Compiles protocol query requests into dialect SQL.

mod context;
pub use context::*;
mod expression;
pub use expression::*;
mod planner;
pub use planner::*;

/// The CTE holding one row per set of variable bindings
pub const VARIABLES_CTE: &str = "_vars";
/// The CTE holding the correlated, row-numbered results of a batched query
pub const RESULTS_CTE: &str = "_results";
/// Prefix of the columns of the variables CTE
pub const VARIABLE_PREFIX: &str = "_var_";
/// The zero-based position of the variable set a row belongs to
pub const INDEX_COLUMN: &str = "_idx";
/// The row number of a result within its variable set
pub const ROW_NUMBER_COLUMN: &str = "_rn";
