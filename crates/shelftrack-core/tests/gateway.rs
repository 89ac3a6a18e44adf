//! HTTP gateway client tests against a mock backend.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelftrack_core::api::{
    ClassificationRequest, GatewayClient, PlacementRequest, RemoteGateway,
};
use shelftrack_core::models::ItemStatus;
use shelftrack_core::Error;

#[tokio::test]
async fn fetch_snapshot_sends_device_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sync"))
        .and(query_param("device_id", "dev-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [],
            "styles": [{
                "id": 1,
                "style_number": "12345",
                "division": "Performance",
                "gender": "Womens",
                "outsole": null,
                "colors": ["Red", "Blue"],
                "source_file_ids": [],
                "updated_at": "2026-01-01T00:00:00Z"
            }],
            "placements": [{
                "id": 9,
                "style_number": "12345",
                "color": "Red",
                "shelf_location": "A1"
            }],
            "sync_metadata": {
                "current_timestamp": "2026-01-02T00:00:00Z",
                "total_styles": 1,
                "total_placements": 1
            }
        })))
        .mount(&server)
        .await;

    let client = GatewayClient::new(server.uri()).unwrap();
    let snapshot = client.fetch_snapshot("dev-1").await.unwrap();

    assert_eq!(snapshot.styles.len(), 1);
    assert_eq!(snapshot.styles[0].colors, vec!["Red", "Blue"]);
    assert_eq!(snapshot.placements[0].shelf_location.as_deref(), Some("A1"));
    assert_eq!(snapshot.sync_metadata.total_styles, Some(1));
}

#[tokio::test]
async fn fetch_delta_sends_since_and_device_id() {
    let server = MockServer::start().await;
    let since = chrono::DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);

    Mock::given(method("GET"))
        .and(path("/api/sync/changes"))
        .and(query_param("since", since.to_rfc3339()))
        .and(query_param("device_id", "dev-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "styles": [],
            "placements": [],
            "sync_metadata": {
                "current_timestamp": "2026-01-02T00:00:00Z",
                "changes_count": 0
            }
        })))
        .mount(&server)
        .await;

    let client = GatewayClient::new(server.uri()).unwrap();
    let delta = client.fetch_delta(since, "dev-1").await.unwrap();

    assert!(delta.styles.is_empty());
    assert_eq!(delta.sync_metadata.changes_count, Some(0));
}

#[tokio::test]
async fn create_classification_posts_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/warehouse/classify"))
        .and(body_json(json!({
            "style_number": "54321",
            "color": "Black",
            "status": "keep"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "classification_id": 42,
            "style_number": "54321",
            "color": "Black",
            "status": "keep",
            "message": "Classification created successfully"
        })))
        .mount(&server)
        .await;

    let client = GatewayClient::new(server.uri()).unwrap();
    let ack = client
        .create_classification(&ClassificationRequest {
            style_number: "54321".to_string(),
            color: "Black".to_string(),
            status: ItemStatus::Keep,
            coordinator_name: None,
            confidence_score: None,
        })
        .await
        .unwrap();

    assert_eq!(ack.classification_id, 42);
    assert_eq!(ack.status, ItemStatus::Keep);
}

#[tokio::test]
async fn create_placement_posts_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/warehouse/placement"))
        .and(body_json(json!({
            "classification_id": 42,
            "shelf_location": "C7"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Placement created successfully",
            "placement_id": 7
        })))
        .mount(&server)
        .await;

    let client = GatewayClient::new(server.uri()).unwrap();
    let ack = client
        .create_placement(&PlacementRequest {
            classification_id: 42,
            shelf_location: "C7".to_string(),
            coordinator_user_id: None,
        })
        .await
        .unwrap();

    assert_eq!(ack.message, "Placement created successfully");
}

#[tokio::test]
async fn non_success_status_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sync"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Internal server error"})),
        )
        .mount(&server)
        .await;

    let client = GatewayClient::new(server.uri()).unwrap();
    let error = client.fetch_snapshot("dev-1").await.unwrap_err();

    match error {
        Error::Api { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("Internal server error"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connectivity_reports_health() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(&server)
        .await;

    let reachable = GatewayClient::new(server.uri()).unwrap();
    assert!(reachable.test_connectivity().await);

    // Port that nothing listens on
    let unreachable = GatewayClient::new("http://127.0.0.1:1").unwrap();
    assert!(!unreachable.test_connectivity().await);
}
