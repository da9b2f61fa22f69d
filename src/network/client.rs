//! HTTP client for talking to cluster nodes

use super::nodes::{Node, NodePool};
use super::request::{ClusterRequest, ClusterResponse, HttpMethod, RequestBody};
use crate::config::ClusterSettings;
use crate::error::{GatewayError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper distributing requests over a node pool
#[derive(Clone)]
pub struct ClusterClient {
    client: Client,
    nodes: Arc<NodePool>,
}

impl ClusterClient {
    /// Create a client for the given pool using the connection settings
    pub fn with_settings(settings: &ClusterSettings, nodes: Arc<NodePool>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .gzip(true)
            .user_agent(concat!("contest-search/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, nodes })
    }

    /// Node pool this client sends to
    pub fn nodes(&self) -> &Arc<NodePool> {
        &self.nodes
    }

    /// Execute a request against the next node in the pool
    pub async fn execute(&self, request: ClusterRequest) -> Result<ClusterResponse> {
        let node = self
            .nodes
            .next()
            .ok_or_else(|| GatewayError::Network("no cluster nodes available".to_string()))?;
        self.execute_on(&node, request).await
    }

    /// Execute a request against a specific node
    pub async fn execute_on(&self, node: &Node, request: ClusterRequest) -> Result<ClusterResponse> {
        let url = node.url(&request.path)?;
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
        };

        debug!("{} {}", method, url);

        let mut req_builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(body) = request.body {
            req_builder = match body {
                RequestBody::Json(json) => req_builder.json(&json),
                RequestBody::Raw(text) => req_builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(text),
            };
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    async fn parse_response(response: Response) -> Result<ClusterResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok(ClusterResponse { status, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ClusterClient {
        let node = Node::new("http", *server.address()).unwrap();
        let pool = Arc::new(NodePool::from_nodes(vec![node]));
        ClusterClient::with_settings(&ClusterSettings::default(), pool).unwrap()
    }

    #[tokio::test]
    async fn test_json_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/logs/event/_count"))
            .and(body_json(json!({"query": {"match_all": {}}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 3})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = ClusterRequest::post("/logs/event/_count")
            .json(json!({"query": {"match_all": {}}}));
        let response = client.execute(request).await.unwrap();

        assert!(response.is_success());
        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn test_raw_body_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/logs/event/1"))
            .and(query_param("refresh", "wait_for"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"result": "created"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = ClusterRequest::put("/logs/event/1")
            .param("refresh", "wait_for")
            .raw(r#"{"id":"1"}"#.to_string());
        let response = client.execute(request).await.unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_unreachable_node_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let pool = Arc::new(NodePool::from_nodes(vec![Node::new("http", addr).unwrap()]));
        let client = ClusterClient::with_settings(&ClusterSettings::default(), pool).unwrap();

        let err = client.execute(ClusterRequest::get("/")).await.unwrap_err();
        assert!(err.is_network());
    }
}
