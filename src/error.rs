//! Error types for the search gateway

use crate::cluster::ConnectionState;
use thiserror::Error;

/// Result alias used throughout the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Everything that can go wrong between a caller and the cluster
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Invalid settings or document coordinates
    #[error("configuration error: {0}")]
    Config(String),

    /// Host resolution or transport failure
    #[error("network error: {0}")]
    Network(String),

    /// JSON serialization or deserialization failure
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Operation attempted while the connection is not usable
    #[error("cluster connection is {0}")]
    State(ConnectionState),

    /// The cluster answered with a non-success status
    #[error("cluster rejected request ({status}): {reason}")]
    Query { status: u16, reason: String },
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Network(err.to_string())
    }
}

impl GatewayError {
    /// Whether the error came from the transport rather than the cluster
    pub fn is_network(&self) -> bool {
        matches!(self, GatewayError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GatewayError::Query {
            status: 400,
            reason: "failed to parse".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cluster rejected request (400): failed to parse"
        );

        let err = GatewayError::State(ConnectionState::Closed);
        assert_eq!(err.to_string(), "cluster connection is closed");
    }
}
