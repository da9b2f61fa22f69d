//! Parsing of count and search responses

use serde::Deserialize;
use serde_json::Value;

/// Body of a `_count` response
#[derive(Debug, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Body of a `_search` response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
}

#[derive(Debug, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// `hits.total` is a plain number on older clusters and an object on newer ones
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value } => *value,
        }
    }
}

/// One matching document
#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "_source", default)]
    pub source: Value,
}
