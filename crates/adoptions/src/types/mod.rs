//! Request, response, and query types used by API handlers.

mod queries;
mod requests;
mod responses;

pub use queries::*;
pub use requests::*;
pub use responses::*;
