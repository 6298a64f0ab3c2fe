//! The Postgres connector built on tokio-postgres.
//!
//! Besides the dialect this crate provides the deadpool backed connection
//! pool, which wire compatible warehouses reuse.

mod conf;
pub use conf::*;
mod connection;
pub use connection::*;
mod data;
pub use data::*;
mod dialect;
pub use dialect::*;
mod pool;
pub use pool::*;
mod runtime;
pub use runtime::*;
mod types;
pub use types::*;
