//! Schema registry subject client
//!
//! A thin client for the registry's subject endpoints. Create and update both
//! `POST /subjects/{subject}/versions`, read fetches
//! `GET /subjects/{subject}/versions/latest`, and delete issues
//! `DELETE /subjects/{subject}`.
//!
//! ```no_run
//! # async fn run() -> Result<(), schema_registry_client::RegistryClientError> {
//! use schema_registry_client::RegistryClient;
//!
//! let client = RegistryClient::new("http://localhost:8081", "orders-value", r#""string""#)?;
//! client.create_subject().await?;
//! let latest = client.read_config().await?;
//! println!("registered version {} with id {}", latest.version, latest.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod observer;
pub mod transport;

pub use client::{RegistryClient, RegistryClientBuilder};
pub use config::ClientSettings;
pub use endpoints::SubjectEndpoints;
pub use error::{
    BoxError, RegistryClientError, RegistryResult, SettingsError, TransportError,
    TransportErrorKind,
};
pub use observer::TracingObserver;
pub use transport::{HttpMethod, ReqwestTransport, Transport, TransportRequest, TransportResponse};

// Re-export the core model so callers need a single dependency
pub use schema_registry_client_core::{
    EventCollector, NoopObserver, Operation, OperationId, RecordedEvent, Reference,
    RegistryEvent, RegistryObserver, SchemaRecord, REGISTRY_CONTENT_TYPE,
};
