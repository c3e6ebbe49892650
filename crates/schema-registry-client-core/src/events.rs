//! Operation events
//!
//! Every client operation reports its progress through a [`RegistryObserver`]
//! instead of writing log lines directly. A single call produces a short event
//! sequence sharing one [`OperationId`]:
//!
//! ```text
//! RequestSent
//!   ├─ TransportFailed                      (no response)
//!   └─ ResponseReceived
//!       ├─ Rejected                         (status != 200)
//!       └─ SchemaDecoded                    (read path only)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use ulid::Ulid;

// ============================================================================
// Identifiers
// ============================================================================

/// Correlates all events emitted by one client call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Ulid);

impl OperationId {
    /// Generate a new unique OperationId.
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl FromStr for OperationId {
    type Err = ulid::DecodeError;

    /// Parse an id back out of a log line or serialized event.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four subject operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Read,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Read => "read",
            Operation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Events
// ============================================================================

/// A single step of a client operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// The request left the client
    RequestSent {
        operation_id: OperationId,
        operation: Operation,
        method: String,
        url: String,
    },
    /// The request did not produce a response
    TransportFailed {
        operation_id: OperationId,
        operation: Operation,
        message: String,
    },
    /// A complete response body was read
    ResponseReceived {
        operation_id: OperationId,
        operation: Operation,
        status: u16,
        elapsed_ms: u64,
        body: String,
    },
    /// The registry answered with a non-200 status
    Rejected {
        operation_id: OperationId,
        operation: Operation,
        status: u16,
        body: String,
    },
    /// The read path decoded a schema record
    SchemaDecoded {
        operation_id: OperationId,
        subject: String,
        version: i32,
        id: i32,
        schema: String,
    },
}

impl RegistryEvent {
    pub fn operation_id(&self) -> OperationId {
        match self {
            RegistryEvent::RequestSent { operation_id, .. }
            | RegistryEvent::TransportFailed { operation_id, .. }
            | RegistryEvent::ResponseReceived { operation_id, .. }
            | RegistryEvent::Rejected { operation_id, .. }
            | RegistryEvent::SchemaDecoded { operation_id, .. } => *operation_id,
        }
    }

    /// Short discriminator, handy for assertions and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryEvent::RequestSent { .. } => "request_sent",
            RegistryEvent::TransportFailed { .. } => "transport_failed",
            RegistryEvent::ResponseReceived { .. } => "response_received",
            RegistryEvent::Rejected { .. } => "rejected",
            RegistryEvent::SchemaDecoded { .. } => "schema_decoded",
        }
    }
}

/// Hook receiving every event a client emits.
///
/// Implementations must be cheap; they run inline on the calling task.
pub trait RegistryObserver: Send + Sync {
    fn on_event(&self, event: &RegistryEvent);
}

/// Observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RegistryObserver for NoopObserver {
    fn on_event(&self, _event: &RegistryEvent) {}
}

// ============================================================================
// Event collector
// ============================================================================

/// An event with the time it was observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub observed_at: DateTime<Utc>,
    pub event: RegistryEvent,
}

/// Append-only, thread-safe event recorder.
///
/// Clones share the same buffer, so a collector can be handed to a client as
/// its observer while the caller keeps a handle for inspection.
#[derive(Debug, Clone, Default)]
pub struct EventCollector {
    inner: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedEvent>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all events recorded so far, in arrival order.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.lock().iter().map(|r| r.event.clone()).collect()
    }

    /// Snapshot including observation timestamps.
    pub fn recorded(&self) -> Vec<RecordedEvent> {
        self.lock().clone()
    }

    /// Events belonging to one operation, in arrival order.
    pub fn events_for(&self, operation_id: OperationId) -> Vec<RegistryEvent> {
        self.lock()
            .iter()
            .filter(|r| r.event.operation_id() == operation_id)
            .map(|r| r.event.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<RecordedEvent> {
        std::mem::take(&mut *self.lock())
    }
}

impl RegistryObserver for EventCollector {
    fn on_event(&self, event: &RegistryEvent) {
        self.lock().push(RecordedEvent {
            observed_at: Utc::now(),
            event: event.clone(),
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request_sent(operation_id: OperationId, operation: Operation) -> RegistryEvent {
        RegistryEvent::RequestSent {
            operation_id,
            operation,
            method: "POST".to_string(),
            url: "http://localhost:8081/subjects/s1/versions".to_string(),
        }
    }

    #[test]
    fn test_operation_id_parses_from_log_output() {
        let id = OperationId::new();
        let parsed: OperationId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_operation_id_invalid() {
        let err = "not-a-ulid".parse::<OperationId>().unwrap_err();
        assert!(matches!(
            err,
            ulid::DecodeError::InvalidLength | ulid::DecodeError::InvalidChar
        ));
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "create");
        assert_eq!(Operation::Delete.as_str(), "delete");
    }

    #[test]
    fn test_collector_records_in_order() {
        let collector = EventCollector::new();
        assert!(collector.is_empty());

        let id = OperationId::new();
        collector.on_event(&request_sent(id, Operation::Create));
        collector.on_event(&RegistryEvent::ResponseReceived {
            operation_id: id,
            operation: Operation::Create,
            status: 200,
            elapsed_ms: 3,
            body: r#"{"id":1}"#.to_string(),
        });

        let events = collector.events();
        assert_eq!(collector.len(), 2);
        assert_eq!(events[0].kind(), "request_sent");
        assert_eq!(events[1].kind(), "response_received");
    }

    #[test]
    fn test_clones_share_buffer() {
        let collector = EventCollector::new();
        let handle = collector.clone();

        collector.on_event(&request_sent(OperationId::new(), Operation::Read));
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn test_events_for_filters_by_operation() {
        let collector = EventCollector::new();
        let first = OperationId::new();
        let second = OperationId::new();

        collector.on_event(&request_sent(first, Operation::Create));
        collector.on_event(&request_sent(second, Operation::Update));
        collector.on_event(&RegistryEvent::TransportFailed {
            operation_id: first,
            operation: Operation::Create,
            message: "connection refused".to_string(),
        });

        let events = collector.events_for(first);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.operation_id() == first));
    }

    #[test]
    fn test_drain_empties_collector() {
        let collector = EventCollector::new();
        collector.on_event(&request_sent(OperationId::new(), Operation::Delete));

        let drained = collector.drain();
        assert_eq!(drained.len(), 1);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = RegistryEvent::Rejected {
            operation_id: OperationId::new(),
            operation: Operation::Delete,
            status: 404,
            body: "not found".to_string(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "rejected");
        assert_eq!(json["operation"], "delete");

        let parsed: RegistryEvent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
    }
}
