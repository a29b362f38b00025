//! Request and response objects consumed by the dispatcher.
//!
//! The transport that produces them is not part of this crate: anything that can
//! supply a path, a context prefix and a parameter map can drive the engine.

pub mod request;
pub mod response;

pub use request::{parse_query_params, Request};
pub use response::{Response, NOT_FOUND_BODY};
