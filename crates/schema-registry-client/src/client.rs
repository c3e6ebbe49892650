//! Registry subject client
//!
//! [`RegistryClient`] manages one subject/schema pair. Every operation is a
//! single HTTP round trip: no retries, no caching, no state carried between
//! calls.

use schema_registry_client_core::{
    Operation, OperationId, RegisterSchemaRequest, RegistryEvent, RegistryObserver, SchemaRecord,
    REGISTRY_CONTENT_TYPE,
};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;

use crate::config::ClientSettings;
use crate::endpoints::SubjectEndpoints;
use crate::error::{RegistryClientError, RegistryResult, TransportError, TransportErrorKind};
use crate::observer::TracingObserver;
use crate::transport::{
    HttpMethod, ReqwestTransport, Transport, TransportRequest, TransportResponse,
};

/// Client for creating, updating, reading and deleting one registry subject.
///
/// The client is immutable after construction and can be shared across tasks
/// by reference or behind an `Arc`.
pub struct RegistryClient {
    endpoints: SubjectEndpoints,
    subject: String,
    schema: String,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn RegistryObserver>,
    operation_timeout: Option<Duration>,
}

impl fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryClient")
            .field("endpoints", &self.endpoints)
            .field("subject", &self.subject)
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}

impl RegistryClient {
    /// Create a client for `subject` on the registry at `base_url`, using a
    /// default HTTP transport and the tracing observer.
    pub fn new(
        base_url: impl Into<String>,
        subject: impl Into<String>,
        schema: impl Into<String>,
    ) -> RegistryResult<Self> {
        Self::builder(base_url, subject, schema).build()
    }

    /// Create a client from loaded settings.
    pub fn from_settings(
        settings: &ClientSettings,
        subject: impl Into<String>,
        schema: impl Into<String>,
    ) -> RegistryResult<Self> {
        Self::builder(settings.base_url.clone(), subject, schema)
            .settings(settings.clone())
            .build()
    }

    pub fn builder(
        base_url: impl Into<String>,
        subject: impl Into<String>,
        schema: impl Into<String>,
    ) -> RegistryClientBuilder {
        RegistryClientBuilder {
            base_url: base_url.into(),
            subject: subject.into(),
            schema: schema.into(),
            settings: None,
            transport: None,
            observer: None,
            operation_timeout: None,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn endpoints(&self) -> &SubjectEndpoints {
        &self.endpoints
    }

    /// Register the held schema as the first version of the subject.
    #[instrument(skip(self), fields(subject = %self.subject))]
    pub async fn create_subject(&self) -> RegistryResult<()> {
        self.post_version(Operation::Create).await
    }

    /// Register the held schema as a new version of the subject.
    ///
    /// The registry has no separate update verb, so this is the same request
    /// as [`RegistryClient::create_subject`].
    #[instrument(skip(self), fields(subject = %self.subject))]
    pub async fn update_subject(&self) -> RegistryResult<()> {
        self.post_version(Operation::Update).await
    }

    /// Fetch the latest registered version of the subject.
    #[instrument(skip(self), fields(subject = %self.subject))]
    pub async fn read_config(&self) -> RegistryResult<SchemaRecord> {
        let request = TransportRequest::new(HttpMethod::Get, self.endpoints.latest().clone())
            .with_content_type(REGISTRY_CONTENT_TYPE);

        let (operation_id, response) = self.execute(Operation::Read, request).await?;

        let record: SchemaRecord = serde_json::from_str(&response.body).map_err(|source| {
            RegistryClientError::Decoding {
                status: response.status,
                body: response.body.clone(),
                source,
            }
        })?;

        self.observer.on_event(&RegistryEvent::SchemaDecoded {
            operation_id,
            subject: record.subject.clone(),
            version: record.version,
            id: record.id,
            schema: record.schema.clone(),
        });

        Ok(record)
    }

    /// Delete the subject and all of its versions.
    #[instrument(skip(self), fields(subject = %self.subject))]
    pub async fn delete_subject(&self) -> RegistryResult<()> {
        let request = TransportRequest::new(HttpMethod::Delete, self.endpoints.subject().clone());
        self.execute(Operation::Delete, request).await?;
        Ok(())
    }

    /// POST the held schema to the versions endpoint.
    async fn post_version(&self, operation: Operation) -> RegistryResult<()> {
        let body = serde_json::to_vec(&RegisterSchemaRequest::new(&self.schema))
            .map_err(RegistryClientError::Encoding)?;

        let request = TransportRequest::new(HttpMethod::Post, self.endpoints.versions().clone())
            .with_content_type(REGISTRY_CONTENT_TYPE)
            .with_body(body);

        self.execute(operation, request).await?;
        Ok(())
    }

    /// Perform one exchange, reporting each step to the observer.
    ///
    /// Only a 200 response is returned; anything else becomes
    /// [`RegistryClientError::Registry`].
    async fn execute(
        &self,
        operation: Operation,
        request: TransportRequest,
    ) -> RegistryResult<(OperationId, TransportResponse)> {
        let operation_id = OperationId::new();

        self.observer.on_event(&RegistryEvent::RequestSent {
            operation_id,
            operation,
            method: request.method.to_string(),
            url: request.url.to_string(),
        });

        let started = Instant::now();
        let sent = self.transport.send(request);
        let result = match self.operation_timeout {
            Some(limit) => tokio::time::timeout(limit, sent).await.unwrap_or_else(|_| {
                Err(TransportError::new(
                    TransportErrorKind::Timeout,
                    format!("{operation} did not complete within {limit:?}"),
                ))
            }),
            None => sent.await,
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.observer.on_event(&RegistryEvent::TransportFailed {
                    operation_id,
                    operation,
                    message: err.to_string(),
                });
                return Err(err.into());
            }
        };

        self.observer.on_event(&RegistryEvent::ResponseReceived {
            operation_id,
            operation,
            status: response.status,
            elapsed_ms: started.elapsed().as_millis() as u64,
            body: response.body.clone(),
        });

        if !response.is_ok() {
            self.observer.on_event(&RegistryEvent::Rejected {
                operation_id,
                operation,
                status: response.status,
                body: response.body.clone(),
            });
            return Err(RegistryClientError::Registry {
                status: response.status,
                body: response.body,
            });
        }

        Ok((operation_id, response))
    }
}

/// Builder for [`RegistryClient`].
pub struct RegistryClientBuilder {
    base_url: String,
    subject: String,
    schema: String,
    settings: Option<ClientSettings>,
    transport: Option<Arc<dyn Transport>>,
    observer: Option<Arc<dyn RegistryObserver>>,
    operation_timeout: Option<Duration>,
}

impl RegistryClientBuilder {
    /// Configure the default HTTP transport. Ignored when a custom transport
    /// is supplied; `base_url` in the settings is not consulted.
    pub fn settings(mut self, settings: ClientSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn RegistryObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Bound every operation, including reading the response body.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> RegistryResult<RegistryClient> {
        let endpoints = SubjectEndpoints::new(&self.base_url, &self.subject)?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let http_client = match &self.settings {
                    Some(settings) => settings.http_client()?,
                    None => reqwest::Client::builder()
                        .build()
                        .map_err(TransportError::from)?,
                };
                Arc::new(ReqwestTransport::with_client(http_client))
            }
        };

        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(TracingObserver::new(self.subject.clone())));

        Ok(RegistryClient {
            endpoints,
            subject: self.subject,
            schema: self.schema,
            transport,
            observer,
            operation_timeout: self.operation_timeout,
        })
    }
}
