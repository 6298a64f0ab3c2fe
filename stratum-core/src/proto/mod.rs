//! The data-connector protocol model: query requests, responses and the
//! schema document.

mod request;
pub use request::*;
mod response;
pub use response::*;
mod schema;
pub use schema::*;
