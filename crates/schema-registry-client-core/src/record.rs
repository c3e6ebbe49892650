//! Wire types exchanged with the schema registry
//!
//! These mirror the JSON bodies of the `/subjects/{subject}/versions` family of
//! endpoints. Unknown fields sent by newer registries are ignored.

use serde::{Deserialize, Serialize};

/// Media type the registry expects on request bodies and `Content-Type` headers.
pub const REGISTRY_CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";

/// A named link from one schema to a specific version of another subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Name the referencing schema uses for the import
    pub name: String,
    /// Subject the referenced schema is registered under
    pub subject: String,
    /// Version of the referenced subject
    pub version: i32,
}

/// The latest registered version of a subject, as returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRecord {
    /// Subject name
    pub subject: String,
    /// Version number within the subject
    pub version: i32,
    /// Raw schema text
    pub schema: String,
    /// Registry-wide schema ID
    pub id: i32,
    /// Schemas this one depends on, in registry order
    #[serde(default)]
    pub references: Vec<Reference>,
}

impl SchemaRecord {
    /// Returns `true` if this schema references other subjects.
    pub fn has_references(&self) -> bool {
        !self.references.is_empty()
    }
}

/// Body of a register-version request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterSchemaRequest<'a> {
    /// Raw schema text
    pub schema: &'a str,
}

impl<'a> RegisterSchemaRequest<'a> {
    pub fn new(schema: &'a str) -> Self {
        Self { schema }
    }
}
