//! Shared fixtures for the end-to-end tests
//!
//! [`MockRegistry`] wraps a `wiremock` server and mounts canned responses for
//! the subject endpoints.

use schema_registry_client::{ClientSettings, RegistryClient, RegistryResult};
use schema_registry_client_core::{Reference, SchemaRecord, REGISTRY_CONTENT_TYPE};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A mock registry server.
pub struct MockRegistry {
    server: MockServer,
}

impl MockRegistry {
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Client for `subject` pointed at this server.
    pub fn client(&self, subject: &str, schema: &str) -> RegistryResult<RegistryClient> {
        RegistryClient::from_settings(&ClientSettings::new(self.uri()), subject, schema)
    }

    /// Answer `POST /subjects/{subject}/versions` with a registered id.
    pub async fn accept_versions(&self, subject: &str, id: i32) {
        Mock::given(method("POST"))
            .and(path(format!("/subjects/{subject}/versions")))
            .respond_with(registry_json(200, json!({ "id": id })))
            .mount(&self.server)
            .await;
    }

    /// Answer `GET /subjects/{subject}/versions/latest` with `record`.
    pub async fn serve_latest(&self, record: &SchemaRecord) {
        Mock::given(method("GET"))
            .and(path(format!("/subjects/{}/versions/latest", record.subject)))
            .respond_with(registry_json(200, json!(record)))
            .mount(&self.server)
            .await;
    }

    /// Answer `DELETE /subjects/{subject}` with the deleted versions.
    pub async fn accept_delete(&self, subject: &str, versions: &[i32]) {
        Mock::given(method("DELETE"))
            .and(path(format!("/subjects/{subject}")))
            .respond_with(registry_json(200, json!(versions)))
            .mount(&self.server)
            .await;
    }

    /// Answer every request with a registry error body.
    pub async fn reject_all(&self, status: u16, error_code: u32, message: &str) {
        Mock::given(wiremock::matchers::any())
            .respond_with(registry_json(
                status,
                json!({ "error_code": error_code, "message": message }),
            ))
            .mount(&self.server)
            .await;
    }
}

/// A response carrying the registry media type.
pub fn registry_json(status: u16, body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .insert_header("content-type", REGISTRY_CONTENT_TYPE)
        .set_body_string(body.to_string())
}

/// A record for `subject` with one reference.
pub fn sample_record(subject: &str) -> SchemaRecord {
    SchemaRecord {
        subject: subject.to_string(),
        version: 2,
        schema: r#"{"type":"record","name":"Order","fields":[{"name":"customer","type":"Customer"}]}"#
            .to_string(),
        id: 101,
        references: vec![Reference {
            name: "Customer".to_string(),
            subject: "customer-value".to_string(),
            version: 1,
        }],
    }
}
