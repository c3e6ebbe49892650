//! Default observer forwarding operation events to `tracing`

use schema_registry_client_core::{RegistryEvent, RegistryObserver};
use tracing::{debug, error, warn};

/// Observer that turns every [`RegistryEvent`] into a structured log line.
///
/// Rejections are logged at `error`, transport failures at `warn`, and the
/// rest at `debug` (response bodies and decoded schemas included).
#[derive(Debug, Clone)]
pub struct TracingObserver {
    subject: String,
}

impl TracingObserver {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl RegistryObserver for TracingObserver {
    fn on_event(&self, event: &RegistryEvent) {
        match event {
            RegistryEvent::RequestSent {
                operation_id,
                operation,
                method,
                url,
            } => {
                debug!(
                    subject = %self.subject,
                    operation_id = %operation_id,
                    operation = %operation,
                    method = %method,
                    url = %url,
                    "Sending registry request"
                );
            }
            RegistryEvent::TransportFailed {
                operation_id,
                operation,
                message,
            } => {
                warn!(
                    subject = %self.subject,
                    operation_id = %operation_id,
                    operation = %operation,
                    error = %message,
                    "Registry request failed"
                );
            }
            RegistryEvent::ResponseReceived {
                operation_id,
                operation,
                status,
                elapsed_ms,
                body,
            } => {
                debug!(
                    subject = %self.subject,
                    operation_id = %operation_id,
                    operation = %operation,
                    status = *status,
                    elapsed_ms = *elapsed_ms,
                    body = %body,
                    "Registry response received"
                );
            }
            RegistryEvent::Rejected {
                operation_id,
                operation,
                status,
                body,
            } => {
                error!(
                    subject = %self.subject,
                    operation_id = %operation_id,
                    operation = %operation,
                    status = *status,
                    body = %body,
                    "Registry rejected request"
                );
            }
            RegistryEvent::SchemaDecoded {
                operation_id,
                subject,
                version,
                id,
                schema,
            } => {
                debug!(
                    subject = %subject,
                    operation_id = %operation_id,
                    version = *version,
                    schema_id = *id,
                    schema = %schema,
                    "Decoded latest schema"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_registry_client_core::{Operation, OperationId};

    #[test]
    fn test_observer_handles_every_event() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();

        let observer = TracingObserver::new("orders-value");
        assert_eq!(observer.subject(), "orders-value");

        let operation_id = OperationId::new();
        let events = [
            RegistryEvent::RequestSent {
                operation_id,
                operation: Operation::Read,
                method: "GET".to_string(),
                url: "http://localhost:8081/subjects/orders-value/versions/latest".to_string(),
            },
            RegistryEvent::ResponseReceived {
                operation_id,
                operation: Operation::Read,
                status: 200,
                elapsed_ms: 4,
                body: "{}".to_string(),
            },
            RegistryEvent::Rejected {
                operation_id,
                operation: Operation::Read,
                status: 500,
                body: "boom".to_string(),
            },
            RegistryEvent::TransportFailed {
                operation_id,
                operation: Operation::Read,
                message: "timeout".to_string(),
            },
            RegistryEvent::SchemaDecoded {
                operation_id,
                subject: "orders-value".to_string(),
                version: 1,
                id: 10,
                schema: "\"string\"".to_string(),
            },
        ];

        for event in &events {
            observer.on_event(event);
        }
    }
}
