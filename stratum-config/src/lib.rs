mod loader;
pub use loader::*;
mod validate;
