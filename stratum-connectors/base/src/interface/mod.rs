mod column_type;
pub use column_type::*;
mod connection;
pub use connection::*;
mod dialect;
pub use dialect::*;
