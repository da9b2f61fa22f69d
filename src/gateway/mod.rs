//! Search gateway module
//!
//! Narrow document API over the shared cluster connection: save, count,
//! query and query within a time window.

mod document;
mod service;

pub use document::{DocumentRef, Payload};
pub use service::SearchGateway;
