//! HTTP networking module
//!
//! Provides the node pool, HTTP client and node sniffer used to reach the
//! search cluster.

mod client;
mod nodes;
mod request;
mod sniffer;

pub use client::ClusterClient;
pub use nodes::{Node, NodePool};
pub use request::{document_path, ClusterRequest, ClusterResponse, HttpMethod, RequestBody};
pub use sniffer::Sniffer;
