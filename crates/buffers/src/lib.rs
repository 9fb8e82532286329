//! Binary buffer utilities for the DAAP client.
//!
//! DMAP responses are big-endian, self-similar `name/length/payload`
//! frames. Decoding jumps around a single immutable response buffer by
//! absolute offset, so every read here is bounds-checked and reports where
//! it ran out instead of panicking.
//!
//! # Overview
//!
//! - [`Reader`] - Reads big-endian data from a borrowed byte slice with cursor tracking
//! - [`Writer`] - Writes big-endian data to an auto-growing buffer
//!
//! # Example
//!
//! ```
//! use daap_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.ascii("mlid");
//! writer.u32(4);
//! writer.u32(42);
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(&reader.name().unwrap(), b"mlid");
//! assert_eq!(reader.u32().unwrap(), 4);
//! assert_eq!(reader.u32().unwrap(), 42);
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        /// Absolute offset the read started at.
        offset: usize,
        /// Number of bytes the read needed.
        needed: usize,
        /// Total length of the underlying buffer.
        available: usize,
    },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer {
                offset,
                needed,
                available,
            } => write!(
                f,
                "end of buffer: {needed} bytes at offset {offset} exceed length {available}"
            ),
        }
    }
}

impl std::error::Error for BufferError {}
