//! End-to-end tests against a mock registry server

use schema_registry_client::{
    ClientSettings, EventCollector, RegistryClient, RegistryClientError, RegistryEvent,
    TransportErrorKind,
};
use schema_registry_client_integration_tests::{registry_json, sample_record, MockRegistry};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const SCHEMA: &str = r#"{"type":"record","name":"Order","fields":[{"name":"id","type":"long"}]}"#;

#[tokio::test]
async fn test_subject_lifecycle() {
    let registry = MockRegistry::start().await;
    let record = sample_record("orders-value");

    registry.accept_versions("orders-value", 101).await;
    registry.serve_latest(&record).await;
    registry.accept_delete("orders-value", &[1, 2]).await;

    let client = registry.client("orders-value", SCHEMA).unwrap();

    client.create_subject().await.unwrap();
    client.update_subject().await.unwrap();

    let latest = client.read_config().await.unwrap();
    assert_eq!(latest, record);
    assert_eq!(latest.references[0].subject, "customer-value");

    client.delete_subject().await.unwrap();
}

#[tokio::test]
async fn test_create_sends_registry_payload() {
    let registry = MockRegistry::start().await;
    Mock::given(method("POST"))
        .and(path("/subjects/orders-value/versions"))
        .and(header("content-type", "application/vnd.schemaregistry.v1+json"))
        .and(body_json(json!({ "schema": SCHEMA })))
        .respond_with(registry_json(200, json!({ "id": 7 })))
        .expect(2)
        .mount(registry.server())
        .await;

    let client = registry.client("orders-value", SCHEMA).unwrap();
    client.create_subject().await.unwrap();
    client.update_subject().await.unwrap();
}

#[tokio::test]
async fn test_read_sets_registry_content_type() {
    let registry = MockRegistry::start().await;
    Mock::given(method("GET"))
        .and(path("/subjects/s1/versions/latest"))
        .and(header("content-type", "application/vnd.schemaregistry.v1+json"))
        .respond_with(registry_json(
            200,
            json!({"subject": "s1", "version": 3, "schema": "\"string\"", "id": 42, "references": []}),
        ))
        .expect(1)
        .mount(registry.server())
        .await;

    let record = registry.client("s1", SCHEMA).unwrap().read_config().await.unwrap();
    assert_eq!(record.version, 3);
    assert_eq!(record.id, 42);
    assert!(record.references.is_empty());
}

#[tokio::test]
async fn test_registry_errors_carry_status_and_body() {
    let registry = MockRegistry::start().await;
    registry
        .reject_all(404, 40401, "Subject 'missing' not found.")
        .await;

    let client = registry.client("missing", SCHEMA).unwrap();

    let errors = vec![
        client.create_subject().await.unwrap_err(),
        client.update_subject().await.unwrap_err(),
        client.read_config().await.unwrap_err(),
        client.delete_subject().await.unwrap_err(),
    ];

    for err in errors {
        assert!(err.is_not_found(), "unexpected error: {err}");
        let body: serde_json::Value = serde_json::from_str(err.body().unwrap()).unwrap();
        assert_eq!(body["error_code"], 40401);
    }
}

#[tokio::test]
async fn test_plain_text_conflict_body_is_preserved() {
    let registry = MockRegistry::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(registry.server())
        .await;

    let err = registry
        .client("s1", SCHEMA)
        .unwrap()
        .create_subject()
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "response code is 409: conflict");
}

#[tokio::test]
async fn test_malformed_latest_is_a_decoding_error() {
    let registry = MockRegistry::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"subject\":"))
        .mount(registry.server())
        .await;

    let err = registry
        .client("s1", SCHEMA)
        .unwrap()
        .read_config()
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryClientError::Decoding { status: 200, .. }));
}

#[tokio::test]
async fn test_subject_with_slash_is_encoded() {
    let registry = MockRegistry::start().await;
    Mock::given(method("DELETE"))
        .and(path("/subjects/team%2Forders"))
        .respond_with(registry_json(200, json!([1])))
        .expect(1)
        .mount(registry.server())
        .await;

    registry
        .client("team/orders", SCHEMA)
        .unwrap()
        .delete_subject()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_request_timeout_from_settings() {
    let registry = MockRegistry::start().await;
    Mock::given(method("GET"))
        .respond_with(
            registry_json(200, json!(sample_record("s1"))).set_delay(Duration::from_secs(2)),
        )
        .mount(registry.server())
        .await;

    let settings = ClientSettings::new(registry.uri()).with_request_timeout(Duration::from_millis(500));
    let client = RegistryClient::from_settings(&settings, "s1", SCHEMA).unwrap();

    match client.read_config().await.unwrap_err() {
        RegistryClientError::Transport(err) => assert_eq!(err.kind(), TransportErrorKind::Timeout),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_observer_receives_raw_body() {
    let registry = MockRegistry::start().await;
    let record = sample_record("orders-value");
    registry.serve_latest(&record).await;

    let collector = EventCollector::new();
    let client = RegistryClient::builder(registry.uri(), "orders-value", SCHEMA)
        .observer(Arc::new(collector.clone()))
        .build()
        .unwrap();

    client.read_config().await.unwrap();

    let events = collector.events();
    let body = events
        .iter()
        .find_map(|event| match event {
            RegistryEvent::ResponseReceived { status, body, .. } => {
                assert_eq!(*status, 200);
                Some(body.clone())
            }
            _ => None,
        })
        .expect("response event recorded");

    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["id"], 101);
}

#[tokio::test]
async fn test_concurrent_reads_share_one_client() {
    let registry = MockRegistry::start().await;
    registry.serve_latest(&sample_record("s1")).await;

    let client = Arc::new(registry.client("s1", SCHEMA).unwrap());
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.read_config().await })
        })
        .collect();

    for handle in handles {
        let record = handle.await.unwrap().unwrap();
        assert_eq!(record.id, 101);
    }
    assert_eq!(
        client.endpoints().latest().as_str(),
        format!("{}/subjects/s1/versions/latest", registry.uri())
    );
}
