//! Test doubles for the connector framework

pub use dialect::*;
mod fixtures;
pub use fixtures::*;
pub use pool::*;
