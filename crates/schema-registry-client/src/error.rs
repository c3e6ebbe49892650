//! Error types for registry operations

use std::fmt;
use thiserror::Error;

/// Boxed underlying cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Where in the exchange a transport failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// DNS resolution or TCP/TLS connection failed
    Connect,
    /// The request or the whole operation exceeded its deadline
    Timeout,
    /// The response body could not be read
    Body,
    /// Any other failure building or sending the request
    Request,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Request => "request",
        };
        f.write_str(s)
    }
}

/// Network-level failure: no usable HTTP response was obtained.
#[derive(Error, Debug)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Request
        };
        TransportError::new(kind, err.to_string()).with_source(err)
    }
}

/// Errors returned by [`crate::RegistryClient`] operations.
#[derive(Error, Debug)]
pub enum RegistryClientError {
    #[error("invalid registry url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid subject {subject:?}: {reason}")]
    InvalidSubject { subject: String, reason: String },

    #[error("registry transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to encode request body: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("response code is {status}: {body}")]
    Registry { status: u16, body: String },

    #[error("failed to decode registry response (status {status}): {source}")]
    Decoding {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RegistryClientError {
    /// HTTP status of the response that caused the error, if one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistryClientError::Registry { status, .. }
            | RegistryClientError::Decoding { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body of the response that caused the error, if one arrived.
    pub fn body(&self) -> Option<&str> {
        match self {
            RegistryClientError::Registry { body, .. }
            | RegistryClientError::Decoding { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryClientError>;

/// Errors from loading [`crate::ClientSettings`].
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load client settings: {0}")]
    Load(#[from] config::ConfigError),
}
