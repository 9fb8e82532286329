//! DMAP frame encoder.
//!
//! The client never sends DMAP, but fixtures, tests and tooling need to
//! produce well-formed responses byte for byte.

use daap_buffers::Writer;

use crate::tag::HEADER_LENGTH;

/// Writes `name/length/payload` frames.
///
/// ```
/// use daap_dmap::{ContentCodes, DmapEncoder, Tag};
///
/// let mut encoder = DmapEncoder::new();
/// encoder.container("mlog", |e| {
///     e.i32("mstt", 200);
///     e.i32("mlid", 42);
/// });
/// let data = encoder.flush();
///
/// let codes = ContentCodes::bootstrap();
/// let mut root = Tag::decode(&data, 0, &codes).unwrap();
/// let session = root.get("mlid").unwrap().unwrap();
/// assert_eq!(session.as_i64(), Some(42));
/// ```
#[derive(Debug, Default)]
pub struct DmapEncoder {
    pub writer: Writer,
}

impl DmapEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the encoded bytes and resets the encoder.
    pub fn flush(&mut self) -> Vec<u8> {
        self.writer.flush()
    }

    fn header(&mut self, code: &str, length: u32) {
        debug_assert_eq!(code.len(), 4, "content codes are four bytes");
        self.writer.ascii(code);
        self.writer.u32(length);
    }

    /// Writes a frame with an arbitrary payload.
    pub fn raw(&mut self, code: &str, payload: &[u8]) {
        self.header(code, frame_length(payload.len()));
        self.writer.buf(payload);
    }

    pub fn i8(&mut self, code: &str, value: i8) {
        self.header(code, 1);
        self.writer.i8(value);
    }

    pub fn u8(&mut self, code: &str, value: u8) {
        self.header(code, 1);
        self.writer.u8(value);
    }

    pub fn bool(&mut self, code: &str, value: bool) {
        self.u8(code, u8::from(value));
    }

    pub fn i16(&mut self, code: &str, value: i16) {
        self.header(code, 2);
        self.writer.i16(value);
    }

    pub fn u16(&mut self, code: &str, value: u16) {
        self.header(code, 2);
        self.writer.u16(value);
    }

    pub fn i32(&mut self, code: &str, value: i32) {
        self.header(code, 4);
        self.writer.i32(value);
    }

    pub fn u32(&mut self, code: &str, value: u32) {
        self.header(code, 4);
        self.writer.u32(value);
    }

    /// Writes all eight bytes; decoders only read back the low 32 bits.
    pub fn i64(&mut self, code: &str, value: i64) {
        self.header(code, 8);
        self.writer.i64(value);
    }

    pub fn u64(&mut self, code: &str, value: u64) {
        self.header(code, 8);
        self.writer.u64(value);
    }

    pub fn string(&mut self, code: &str, value: &str) {
        self.header(code, frame_length(value.len()));
        self.writer.utf8(value);
    }

    pub fn date(&mut self, code: &str, seconds: u32) {
        self.u32(code, seconds);
    }

    pub fn version(&mut self, code: &str, parts: &[u8]) {
        self.raw(code, parts);
    }

    /// Writes a container whose children are produced by `body`.
    ///
    /// The length is patched in after `body` returns.
    pub fn container(&mut self, code: &str, body: impl FnOnce(&mut Self)) {
        let start = self.writer.x();
        self.header(code, 0);
        body(self);
        let length = self.writer.x() - start - HEADER_LENGTH;
        self.writer.set_u32(start + 4, frame_length(length));
    }
}

/// The `u32` length field of a frame.
///
/// DMAP cannot describe payloads of 4 GiB or more. Debug builds panic on
/// one; release builds write `u32::MAX`.
fn frame_length(len: usize) -> u32 {
    debug_assert!(u32::try_from(len).is_ok(), "DMAP payload of {len} bytes exceeds 4 GiB");
    u32::try_from(len).unwrap_or(u32::MAX)
}
