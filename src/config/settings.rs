//! Settings structures for the contest service

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub elasticsearch: ClusterSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (CONTEST_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("CONTEST_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("CONTEST_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("CONTEST_ES_HOSTS") {
            self.elasticsearch.hosts = val
                .split(',')
                .map(|h| h.trim())
                .filter(|h| !h.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(val) = var("CONTEST_ES_PORT") {
            if let Ok(port) = val.parse() {
                self.elasticsearch.port = port;
            }
        }
        if let Some(val) = var("CONTEST_ES_CLUSTER_NAME") {
            self.elasticsearch.cluster_name = val;
        }
        if let Some(val) = var("CONTEST_ES_SNIFF") {
            self.elasticsearch.sniff = val.parse().unwrap_or(true);
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Search cluster connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
    /// Cluster hosts, every one is registered with the same connection
    pub hosts: Vec<String>,
    /// Port used for every host
    pub port: u16,
    /// Name the cluster must report for sniffed nodes to be accepted
    pub cluster_name: String,
    /// Periodically refresh the node list from the cluster
    pub sniff: bool,
    /// Seconds between two sniff rounds
    pub sniff_interval: u64,
    /// URL scheme used to reach the nodes
    pub scheme: String,
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Refresh policy applied when saving documents
    pub refresh: RefreshPolicy,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            port: 9300,
            cluster_name: "elasticsearch".to_string(),
            sniff: true,
            sniff_interval: 5,
            scheme: "http".to_string(),
            request_timeout: 30.0,
            refresh: RefreshPolicy::default(),
        }
    }
}

impl ClusterSettings {
    /// Settings for the given hosts, everything else default
    pub fn with_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// When a saved document becomes visible to searches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Leave visibility to the cluster's refresh interval
    #[serde(rename = "false")]
    None,
    /// Block until the next refresh makes the document visible
    #[default]
    WaitFor,
    /// Force a refresh of the affected shards
    #[serde(rename = "true")]
    Immediate,
}

impl RefreshPolicy {
    /// Value of the `refresh` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            RefreshPolicy::None => "false",
            RefreshPolicy::WaitFor => "wait_for",
            RefreshPolicy::Immediate => "true",
        }
    }
}
