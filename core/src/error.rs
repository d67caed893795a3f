//! Error types for the cloud API client.
//!
//! # Design
//! Network failures keep the underlying error as their `source()` so callers
//! see exactly what the transport reported. Non-2xx responses carry the raw
//! status and body. `NotFound` is produced only by the name lookups, never by
//! the transport.

use std::fmt;

use thiserror::Error;

/// Which catalog a failed name lookup searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Template,
    Package,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Template => write!(f, "template"),
            ResourceKind::Package => write!(f, "package"),
        }
    }
}

/// Errors returned by `Client` and `CloudApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, timeout, I/O).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A lookup by name matched nothing.
    #[error("no {kind} named {name:?} found on datacenter {endpoint}")]
    NotFound {
        kind: ResourceKind,
        name: String,
        endpoint: String,
    },
}

impl ApiError {
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ApiError::Transport(Box::new(err))
    }
}
