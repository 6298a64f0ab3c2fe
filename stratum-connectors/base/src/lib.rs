pub mod common;
pub mod compiler;
pub mod interface;

#[cfg(any(test, feature = "test"))]
pub mod test;
