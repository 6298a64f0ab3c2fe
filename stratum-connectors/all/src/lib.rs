//! Dispatch over every supported dialect by its type string

mod container;
pub use container::*;
