//! A single connection to the search cluster

use crate::config::ClusterSettings;
use crate::error::{GatewayError, Result};
use crate::network::{ClusterClient, ClusterRequest, ClusterResponse, NodePool, Sniffer};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Lifecycle of the cluster connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Uninitialized,
    Connected,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Uninitialized => "uninitialized",
            ConnectionState::Connected => "connected",
            ConnectionState::Closed => "closed",
        };
        f.write_str(s)
    }
}

const CONNECTED: u8 = 1;
const CLOSED: u8 = 2;

/// Every configured endpoint registered with one client, plus the sniffer
pub struct ClusterConnection {
    settings: ClusterSettings,
    client: ClusterClient,
    state: AtomicU8,
    sniffer: Mutex<Option<JoinHandle<()>>>,
}

impl ClusterConnection {
    /// Resolve every host, build the client and start sniffing if enabled.
    ///
    /// Sniffing needs a Tokio runtime; without one it is skipped.
    pub fn connect(settings: &ClusterSettings) -> Result<Self> {
        let nodes = Arc::new(NodePool::resolve(
            &settings.scheme,
            &settings.hosts,
            settings.port,
        )?);
        let client = ClusterClient::with_settings(settings, nodes)?;

        let sniffer = if settings.sniff {
            match tokio::runtime::Handle::try_current() {
                Ok(_) => {
                    let sniffer =
                        Sniffer::new(client.clone(), &settings.cluster_name, &settings.scheme);
                    Some(sniffer.spawn(Duration::from_secs(settings.sniff_interval.max(1))))
                }
                Err(_) => {
                    warn!("No async runtime available, node sniffing disabled");
                    None
                }
            }
        } else {
            None
        };

        info!(
            "Connected to cluster '{}' with {} node(s)",
            settings.cluster_name,
            client.nodes().len()
        );

        Ok(Self {
            settings: settings.clone(),
            client,
            state: AtomicU8::new(CONNECTED),
            sniffer: Mutex::new(sniffer),
        })
    }

    /// Settings the connection was built with
    pub fn settings(&self) -> &ClusterSettings {
        &self.settings
    }

    pub fn state(&self) -> ConnectionState {
        match self.state.load(Ordering::Acquire) {
            CONNECTED => ConnectionState::Connected,
            _ => ConnectionState::Closed,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Number of nodes currently in the pool
    pub fn node_count(&self) -> usize {
        self.client.nodes().len()
    }

    pub(crate) fn nodes(&self) -> &Arc<NodePool> {
        self.client.nodes()
    }

    /// Send a request, failing with a state error once closed
    pub async fn send(&self, request: ClusterRequest) -> Result<ClusterResponse> {
        self.ensure_connected()?;
        self.client.execute(request).await
    }

    fn ensure_connected(&self) -> Result<()> {
        match self.state() {
            ConnectionState::Connected => Ok(()),
            state => Err(GatewayError::State(state)),
        }
    }

    /// Stop sniffing and mark the connection closed. Idempotent.
    pub fn close(&self) {
        let mut sniffer = match self.sniffer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Sniffer lock poisoned while closing cluster connection");
                poisoned.into_inner()
            }
        };

        if self.state.swap(CLOSED, Ordering::AcqRel) == CLOSED {
            return;
        }
        if let Some(handle) = sniffer.take() {
            handle.abort();
        }
        info!("Closed connection to cluster '{}'", self.settings.cluster_name);
    }
}

impl Drop for ClusterConnection {
    fn drop(&mut self) {
        if let Ok(mut sniffer) = self.sniffer.lock() {
            if let Some(handle) = sniffer.take() {
                handle.abort();
            }
        }
    }
}

impl fmt::Debug for ClusterConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConnection")
            .field("cluster_name", &self.settings.cluster_name)
            .field("nodes", &self.node_count())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_settings() -> ClusterSettings {
        ClusterSettings {
            sniff: false,
            ..ClusterSettings::with_hosts(["127.0.0.1"])
        }
    }

    #[test]
    fn test_connect_and_close() {
        let conn = ClusterConnection::connect(&local_settings()).unwrap();
        assert_eq!(conn.state(), ConnectionState::Connected);
        assert_eq!(conn.node_count(), 1);

        conn.close();
        assert_eq!(conn.state(), ConnectionState::Closed);
        conn.close();
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    #[test]
    fn test_empty_hosts_rejected() {
        let err = ClusterConnection::connect(&ClusterSettings::default()).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[tokio::test]
    async fn test_send_after_close_is_state_error() {
        let conn = ClusterConnection::connect(&local_settings()).unwrap();
        conn.close();
        let err = conn.send(ClusterRequest::get("/")).await.unwrap_err();
        assert!(matches!(err, GatewayError::State(ConnectionState::Closed)));
    }

    #[tokio::test]
    async fn test_sniffer_stops_on_close() {
        let settings = ClusterSettings {
            sniff: true,
            ..local_settings()
        };
        let conn = ClusterConnection::connect(&settings).unwrap();
        assert!(conn.sniffer.lock().unwrap().is_some());
        conn.close();
        assert!(conn.sniffer.lock().unwrap().is_none());
    }
}
