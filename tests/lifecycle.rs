//! Lifecycle of the process-wide cluster connection

use contest_search::cluster::{self, ConnectionState};
use contest_search::{ClusterSettings, GatewayError, SearchGateway};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> ClusterSettings {
    ClusterSettings {
        sniff: false,
        port: server.address().port(),
        ..ClusterSettings::with_hosts([server.address().ip().to_string()])
    }
}

#[tokio::test]
async fn test_shared_connection_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logs/event/_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 5})))
        .mount(&server)
        .await;

    assert_eq!(cluster::state(), ConnectionState::Uninitialized);

    let err = SearchGateway::new(ClusterSettings::default()).unwrap_err();
    assert!(matches!(err, GatewayError::Config(_)));
    assert_eq!(cluster::state(), ConnectionState::Uninitialized);

    let first = assert_ok!(SearchGateway::new(settings_for(&server)));
    assert_eq!(cluster::state(), ConnectionState::Connected);
    assert_eq!(first.count("logs", "event", None).await, 5);

    // A second construction keeps the existing connection but its own settings
    let other = ClusterSettings {
        cluster_name: "other".to_string(),
        port: 1,
        ..settings_for(&server)
    };
    let second = assert_ok!(SearchGateway::new(other));
    assert_eq!(second.settings().cluster_name, "other");
    assert_eq!(second.count("logs", "event", None).await, 5);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    cluster::teardown();
    cluster::teardown();
    assert_eq!(cluster::state(), ConnectionState::Closed);
    assert_eq!(first.state(), ConnectionState::Closed);

    assert_eq!(first.count("logs", "event", None).await, 0);
    let err = second.try_count("logs", "event", None).await.unwrap_err();
    assert!(matches!(err, GatewayError::State(ConnectionState::Closed)));

    // No way back to connected
    let third = assert_ok!(SearchGateway::new(settings_for(&server)));
    assert_eq!(third.state(), ConnectionState::Closed);
    third.teardown();
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
