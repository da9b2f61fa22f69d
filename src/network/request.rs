//! Request and response types exchanged with cluster nodes

use crate::error::{GatewayError, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

/// Request body types
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
    /// JSON text the caller already encoded
    Raw(String),
}

/// Request to be sent to one node of the cluster
#[derive(Debug, Clone)]
pub struct ClusterRequest {
    /// Path relative to the node root, already percent-encoded
    pub path: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// Request body
    pub body: Option<RequestBody>,
}

impl ClusterRequest {
    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Create a POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Create a PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            params: HashMap::new(),
            body: None,
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add JSON body
    pub fn json(mut self, data: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(data));
        self
    }

    /// Add a pre-encoded JSON body
    pub fn raw(mut self, data: String) -> Self {
        self.body = Some(RequestBody::Raw(data));
        self
    }
}

/// Build a request path from unencoded segments
pub fn document_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .map(|s| format!("/{}", urlencoding::encode(s)))
        .collect()
}

/// Response from a cluster node
#[derive(Debug)]
pub struct ClusterResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl ClusterResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse response as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Turn a non-2xx response into a query error carrying the cluster's reason
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(GatewayError::Query {
            status: self.status,
            reason: self.reason(),
        })
    }

    /// Extract `error.reason` from an error body, falling back to the raw text
    fn reason(&self) -> String {
        let parsed: Option<serde_json::Value> = serde_json::from_str(&self.text).ok();
        parsed
            .as_ref()
            .and_then(|v| v.get("error"))
            .and_then(|e| match e {
                serde_json::Value::String(s) => Some(s.clone()),
                other => other
                    .get("reason")
                    .and_then(|r| r.as_str())
                    .map(String::from),
            })
            .unwrap_or_else(|| self.text.clone())
    }
}
