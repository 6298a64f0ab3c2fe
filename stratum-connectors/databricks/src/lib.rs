//! The Databricks connector

mod dialect;
pub use dialect::*;
mod types;
pub use types::*;
