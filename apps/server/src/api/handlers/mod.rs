//! Request handlers for API endpoints
//!
//! Handlers extract the parameter bag, call the listing service and shape
//! the JSON response. Errors convert through [`crate::Error`].

pub mod listings;
pub mod tags;

pub use listings::*;
pub use tags::*;
