//! Process-wide cluster connection
//!
//! The first successful [`shared`] call builds the connection; later calls
//! reuse it, whatever settings they pass. [`teardown`] closes it for good:
//! there is no way back to `Connected` within one process.

mod connection;

pub use connection::{ClusterConnection, ConnectionState};

use crate::config::ClusterSettings;
use crate::error::Result;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::warn;

static SHARED: OnceCell<Arc<ClusterConnection>> = OnceCell::new();

/// Get the shared connection, building it from `settings` if none exists yet
pub fn shared(settings: &ClusterSettings) -> Result<Arc<ClusterConnection>> {
    let conn = SHARED.get_or_try_init(|| ClusterConnection::connect(settings).map(Arc::new))?;
    if conn.settings() != settings {
        warn!(
            "Reusing existing connection to cluster '{}', new settings not applied",
            conn.settings().cluster_name
        );
    }
    Ok(conn.clone())
}

/// State of the shared connection
pub fn state() -> ConnectionState {
    SHARED
        .get()
        .map(|c| c.state())
        .unwrap_or(ConnectionState::Uninitialized)
}

/// Close the shared connection if one exists.
///
/// Meant for process shutdown and test teardown only.
pub fn teardown() {
    if let Some(conn) = SHARED.get() {
        conn.close();
    }
}
