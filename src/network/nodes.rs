//! Node pool shared by all requests of one connection

use crate::error::{GatewayError, Result};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use tracing::info;
use url::Url;

/// One reachable cluster node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Resolved socket address
    pub addr: SocketAddr,
    /// Base URL requests are joined onto
    pub base_url: Url,
}

impl Node {
    /// Build a node from a resolved address
    pub fn new(scheme: &str, addr: SocketAddr) -> Result<Self> {
        let base_url = Url::parse(&format!("{}://{}/", scheme, addr))
            .map_err(|e| GatewayError::Config(format!("invalid node url for {}: {}", addr, e)))?;
        Ok(Self { addr, base_url })
    }

    /// Resolve `host:port` to a node
    pub fn resolve(scheme: &str, host: &str, port: u16) -> Result<Self> {
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| GatewayError::Network(format!("cannot resolve {}: {}", host, e)))?
            .next()
            .ok_or_else(|| GatewayError::Network(format!("no address for {}", host)))?;
        Self::new(scheme, addr)
    }

    /// Full URL for a path such as `/logs/event/_count`
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::Config(format!("invalid request path {}: {}", path, e)))
    }
}

/// Round-robin set of nodes
#[derive(Debug)]
pub struct NodePool {
    nodes: RwLock<Vec<Node>>,
    cursor: AtomicUsize,
}

impl NodePool {
    /// Resolve every host and register it with a single pool
    pub fn resolve(scheme: &str, hosts: &[String], port: u16) -> Result<Self> {
        if hosts.is_empty() {
            return Err(GatewayError::Config(
                "missing config entry: elasticsearch.hosts".to_string(),
            ));
        }

        let mut nodes = Vec::with_capacity(hosts.len());
        for host in hosts {
            info!("Search cluster host: {}", host);
            let node = Node::resolve(scheme, host, port)?;
            if !nodes.contains(&node) {
                nodes.push(node);
            }
        }

        Ok(Self::from_nodes(nodes))
    }

    /// Pool over already-resolved nodes
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes: RwLock::new(nodes),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Next node in round-robin order
    pub fn next(&self) -> Option<Node> {
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        if nodes.is_empty() {
            return None;
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % nodes.len();
        Some(nodes[i].clone())
    }

    /// Replace the pool contents; an empty list is ignored
    pub fn replace(&self, nodes: Vec<Node>) -> bool {
        if nodes.is_empty() {
            return false;
        }
        let mut current = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        *current = nodes;
        true
    }

    /// Snapshot of the known nodes
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
