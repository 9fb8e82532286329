//! Client error types.

use daap_dmap::DmapError;
use thiserror::Error;

use crate::Status;

/// Why a request never produced a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// The server answered with a non-2xx status.
    Status(u16),
    Timeout,
    /// Connection-level failure, described by the transport.
    Transport(String),
}

impl std::fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestErrorKind::Status(code) => write!(f, "HTTP status {code}"),
            RequestErrorKind::Timeout => write!(f, "timed out"),
            RequestErrorKind::Transport(reason) => write!(f, "{reason}"),
        }
    }
}

/// A failed request, as reported by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("requesting {url} failed: {kind}")]
pub struct RequestError {
    pub url: String,
    pub kind: RequestErrorKind,
}

impl RequestError {
    pub fn new(url: impl Into<String>, kind: RequestErrorKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DaapError {
    /// The operation is not allowed in the current session state.
    #[error("invalid status {status} for {operation}")]
    InvalidState {
        status: Status,
        operation: &'static str,
    },
    /// A field was read with a code the active table does not know.
    #[error("unknown content code {0}")]
    UnknownContentCode(String),
    /// The response body is not a DMAP tree, or lacks a required field.
    #[error("invalid data in response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl DaapError {
    /// Attributes a decoder error to the response from `url`.
    pub(crate) fn decoding(url: &str, err: DmapError) -> Self {
        match err {
            DmapError::UnknownContentCode(code) => DaapError::UnknownContentCode(code),
            other => DaapError::Decode {
                url: url.to_owned(),
                reason: other.to_string(),
            },
        }
    }
}
