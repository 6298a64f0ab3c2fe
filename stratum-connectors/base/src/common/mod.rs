mod assembler;
pub use assembler::*;
mod catalog;
pub use catalog::*;
mod codec;
pub use codec::*;
mod literal;
pub use literal::*;
mod schema;
pub use schema::*;
mod state;
pub use state::*;
mod type_name;
pub use type_name::*;
