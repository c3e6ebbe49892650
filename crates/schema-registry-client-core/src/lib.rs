//! Core types for the schema registry subject client
//!
//! This crate holds the registry wire model and the operation event hook. It
//! has no HTTP dependency; the transport lives in `schema-registry-client`.

pub mod events;
pub mod record;

pub use events::{
    EventCollector, NoopObserver, Operation, OperationId, RecordedEvent, RegistryEvent,
    RegistryObserver,
};
pub use record::{RegisterSchemaRequest, Reference, SchemaRecord, REGISTRY_CONTENT_TYPE};
