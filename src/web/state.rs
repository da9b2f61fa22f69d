//! Application state shared across handlers

use crate::cluster::ConnectionState;
use crate::config::Settings;
use crate::gateway::SearchGateway;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search gateway, absent when no cluster hosts are configured
    pub gateway: Option<SearchGateway>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, gateway: Option<SearchGateway>) -> Self {
        Self {
            settings: Arc::new(settings),
            gateway,
        }
    }

    /// State of the cluster connection backing the gateway
    pub fn cluster_state(&self) -> ConnectionState {
        self.gateway
            .as_ref()
            .map(|g| g.state())
            .unwrap_or(ConnectionState::Uninitialized)
    }
}
