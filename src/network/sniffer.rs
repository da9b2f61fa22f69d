//! Background discovery of cluster nodes

use super::client::ClusterClient;
use super::nodes::Node;
use super::request::ClusterRequest;
use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct NodesInfo {
    cluster_name: String,
    #[serde(default)]
    nodes: HashMap<String, NodeInfo>,
}

#[derive(Debug, Deserialize)]
struct NodeInfo {
    http: Option<HttpInfo>,
}

#[derive(Debug, Deserialize)]
struct HttpInfo {
    publish_address: String,
}

/// Periodically refreshes the node pool of a client
pub struct Sniffer {
    client: ClusterClient,
    cluster_name: String,
    scheme: String,
}

impl Sniffer {
    pub fn new(client: ClusterClient, cluster_name: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            client,
            cluster_name: cluster_name.into(),
            scheme: scheme.into(),
        }
    }

    /// Run sniff rounds every `interval` on the current runtime
    pub fn spawn(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match self.sniff_once().await {
                    Ok(count) => debug!("Sniffed {} cluster nodes", count),
                    Err(e) => warn!("Node sniffing failed: {}", e),
                }
            }
        })
    }

    /// Ask one known node for the cluster's HTTP nodes and replace the pool.
    ///
    /// Returns the number of nodes in the pool afterwards. Answers from a
    /// cluster with a different name leave the pool untouched.
    pub async fn sniff_once(&self) -> Result<usize> {
        let response = self
            .client
            .execute(ClusterRequest::get("/_nodes/http"))
            .await?
            .error_for_status()?;
        let info: NodesInfo = response.json()?;

        let pool = self.client.nodes();
        if info.cluster_name != self.cluster_name {
            warn!(
                "Ignoring nodes of cluster '{}', expected '{}'",
                info.cluster_name, self.cluster_name
            );
            return Ok(pool.len());
        }

        let mut nodes: Vec<Node> = info
            .nodes
            .values()
            .filter_map(|n| n.http.as_ref())
            .filter_map(|http| parse_publish_address(&http.publish_address))
            .filter_map(|addr| Node::new(&self.scheme, addr).ok())
            .collect();
        nodes.sort_by_key(|n| n.addr);
        nodes.dedup();

        pool.replace(nodes);
        Ok(pool.len())
    }
}

/// Parse `1.2.3.4:9200` or `hostname/1.2.3.4:9200`
fn parse_publish_address(raw: &str) -> Option<SocketAddr> {
    let addr = raw.rsplit('/').next().unwrap_or(raw);
    addr.parse().ok()
}
