//! DMAP decoder error type.

use thiserror::Error;

/// Error type for DMAP decoding.
///
/// Missing children are never errors: they surface as invalid tags or
/// `None` values. Only unknown codes and reads past the end of the
/// response buffer fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DmapError {
    #[error("unknown content code {0}")]
    UnknownContentCode(String),
    #[error("content code must be exactly 4 bytes, got {0:?}")]
    InvalidContentCode(String),
    #[error("tag header at offset {offset} exceeds buffer length {available}")]
    TruncatedHeader { offset: usize, available: usize },
    #[error("tag {code} truncated: {needed} bytes at offset {offset} exceed buffer length {available}")]
    Truncated {
        code: String,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("tag {code} at offset {offset} is nested deeper than {limit} containers")]
    TooDeep {
        code: String,
        offset: usize,
        limit: usize,
    },
}
