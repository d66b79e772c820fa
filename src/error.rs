//! Error types returned by [`Client`](crate::client::Client) operations.
//!
//! Status codes the API uses with a defined meaning get their own variant so
//! callers can match on them; everything else non-2xx lands in
//! [`Error::Status`] with the raw status line.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, ThisError)]
pub enum Error {
    /// The client itself is misconfigured (empty endpoint, bad verb, bad header value).
    #[error("client: {0}")]
    Config(String),

    /// A required argument was empty; raised before any request is sent.
    #[error("client: missing {0}")]
    Input(&'static str),

    /// A resource name that cannot stand as a single path segment.
    #[error("client: invalid name {0:?}")]
    InvalidName(String),

    /// 401
    #[error("authentication failed")]
    Authentication,

    /// 404
    #[error("resource not found")]
    NotFound,

    /// 400 or 422 with a structured error body.
    #[error("{0}")]
    Validation(ServerErrors),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("error decoding JSON body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Any other non-success status.
    #[error("client: {0}")]
    Status(StatusCode),
}

/// Validation failure body: `{"errors": ["...", "..."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrors {
    #[serde(default)]
    pub errors: Vec<String>,
}

impl fmt::Display for ServerErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.errors.join(", "))
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Error::Config(format!("invalid endpoint: {error}"))
    }
}
