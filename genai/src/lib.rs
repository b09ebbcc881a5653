mod client_utils;
mod errors;
pub mod google;
mod model;
mod opentelemetry;
pub mod testing;
mod types;
mod types_ext;

pub use errors::*;
pub use model::GenerativeModel;
pub use types::*;
