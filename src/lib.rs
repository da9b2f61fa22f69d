//! contest-search: greeting service and search cluster gateway
//!
//! The gateway keeps one process-wide connection to a clustered full-text
//! search engine and offers a narrow document API on top of it: save,
//! count, query, and query within a time window.

pub mod cluster;
pub mod config;
pub mod error;
pub mod gateway;
pub mod network;
pub mod query;
pub mod time;
pub mod web;

pub use config::{ClusterSettings, Settings};
pub use error::{GatewayError, Result};
pub use gateway::SearchGateway;
pub use query::{Filter, TimeWindow};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
