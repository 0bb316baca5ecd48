//! Error types shared across the crate
//!
//! Every fallible path in the client and reconciler returns the same
//! [`Error`] enum; nothing is swallowed and nothing is retried locally.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required field is missing or an identity-field set is empty.
    /// Raised synchronously, before any network call is made.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced parent resource (service for a route, attachment point
    /// for a plugin) does not exist on the gateway.
    #[error("{0}")]
    NotFound(String),

    /// Create was attempted on a resource the probe confirmed present.
    #[error("{0}")]
    AlreadyExists(String),

    /// The gateway answered with a non-2xx status (404 on existence probes
    /// excepted). Carries the status and the serialized response body.
    #[error("gateway returned HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// Connection-level failure (refused, DNS, malformed response).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Declarative config file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Filesystem error while loading config or credentials.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
