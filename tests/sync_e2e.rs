//! End-to-end reconciliation against a mock gateway
//!
//! Drives the public flows the way the binary does: a desired config, a
//! fresh (or converged) remote store, and assertions on exactly which admin
//! API calls happen.

use gateway_sync::client::{AdminClient, RouteConfig};
use gateway_sync::config::{Credentials, RouteDefinition, ServiceDefinition, SyncConfig};
use gateway_sync::reconcile;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn desired_service() -> ServiceDefinition {
    ServiceDefinition {
        name: "svc".to_string(),
        url: "http://127.0.0.1:80/".to_string(),
        plugins: vec![],
        routes: vec![RouteDefinition {
            host: Some("example.com".to_string()),
            path: Some("/users".to_string()),
            method: Some("get".to_string()),
            plugins: vec![],
        }],
    }
}

#[tokio::test]
async fn register_against_an_empty_store_creates_service_and_route() {
    let server = MockServer::start().await;

    // The service is absent for the existence probe and the create-internal
    // probe, then present once created.
    Mock::given(method("GET"))
        .and(path("/services/svc"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/svc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "s-1", "name": "svc", "url": "http://127.0.0.1:80/"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/services"))
        .and(body_json(serde_json::json!({
            "name": "svc",
            "url": "http://127.0.0.1:80/"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "s-1", "name": "svc", "url": "http://127.0.0.1:80/"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // No routes registered yet
    Mock::given(method("GET"))
        .and(path("/services/svc/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/routes"))
        .and(body_json(serde_json::json!({
            "service": { "id": "s-1" },
            "hosts": ["example.com"],
            "paths": ["/users"],
            "methods": ["GET"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "r-1",
            "hosts": ["example.com"],
            "paths": ["/users"],
            "methods": ["GET"],
            "service": { "id": "s-1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::new(&Credentials::from_url(server.uri())).unwrap();
    let definition = desired_service();
    reconcile::register_services(&client, &[&definition])
        .await
        .unwrap();
}

#[tokio::test]
async fn second_register_run_creates_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/svc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "s-1", "name": "svc", "url": "http://127.0.0.1:80/"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = AdminClient::new(&Credentials::from_url(server.uri())).unwrap();
    let definition = desired_service();
    reconcile::register_services(&client, &[&definition])
        .await
        .unwrap();
}

#[tokio::test]
async fn created_route_is_findable_by_its_identity_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/svc/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "id": "r-1",
                "hosts": ["example.com"],
                "paths": ["/users"],
                "methods": ["GET"]
            }]
        })))
        .mount(&server)
        .await;

    let client = AdminClient::new(&Credentials::from_url(server.uri())).unwrap();
    let config = RouteConfig {
        hosts: Some(vec!["example.com".to_string()]),
        paths: Some(vec!["/users".to_string()]),
        methods: Some(vec!["GET".to_string()]),
    };
    let route = client
        .find_route_by_config("svc", &config)
        .await
        .unwrap()
        .expect("route created in the previous pass must be found");
    assert!(!route.id.is_empty());
}

#[tokio::test]
async fn config_file_round_trips_through_the_register_flow() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/orders-service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "s-7", "name": "orders-service", "url": "http://127.0.0.1:3000"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let yaml = format!(
        r#"
admin_api_url: {}
services:
  - name: orders-service
    url: http://127.0.0.1:3000
    routes:
      - path: /orders
        method: post
"#,
        server.uri()
    );
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("gateway.yml");
    std::fs::write(&config_path, yaml).unwrap();

    let config = SyncConfig::from_file(&config_path).unwrap();
    let url = config.admin_api_url.clone().unwrap();
    let client = AdminClient::new(&Credentials::from_url(url)).unwrap();

    let services = config.selected_services(None);
    reconcile::register_services(&client, &services).await.unwrap();
}
