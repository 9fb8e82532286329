//! Auto-growing big-endian writer.

/// A binary writer that appends big-endian data to an internal buffer.
///
/// # Example
///
/// ```
/// use daap_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u16(0x0102);
/// writer.i8(-1);
/// assert_eq!(writer.flush(), vec![0x01, 0x02, 0xff]);
/// assert_eq!(writer.x(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Writer {
    /// Bytes written since the last flush.
    pub uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current write position.
    pub fn x(&self) -> usize {
        self.uint8.len()
    }

    /// Returns the written bytes and resets the writer.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    pub fn u8(&mut self, value: u8) {
        self.uint8.push(value);
    }

    pub fn i8(&mut self, value: i8) {
        self.uint8.extend_from_slice(&value.to_be_bytes());
    }

    pub fn u16(&mut self, value: u16) {
        self.uint8.extend_from_slice(&value.to_be_bytes());
    }

    pub fn i16(&mut self, value: i16) {
        self.uint8.extend_from_slice(&value.to_be_bytes());
    }

    pub fn u32(&mut self, value: u32) {
        self.uint8.extend_from_slice(&value.to_be_bytes());
    }

    pub fn i32(&mut self, value: i32) {
        self.uint8.extend_from_slice(&value.to_be_bytes());
    }

    pub fn u64(&mut self, value: u64) {
        self.uint8.extend_from_slice(&value.to_be_bytes());
    }

    pub fn i64(&mut self, value: i64) {
        self.uint8.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes raw bytes.
    pub fn buf(&mut self, data: &[u8]) {
        self.uint8.extend_from_slice(data);
    }

    /// Writes a string as UTF-8 bytes.
    pub fn utf8(&mut self, s: &str) {
        self.uint8.extend_from_slice(s.as_bytes());
    }

    /// Writes a string one byte per character, keeping the low 8 bits.
    pub fn ascii(&mut self, s: &str) {
        self.uint8.extend(s.chars().map(|c| c as u32 as u8));
    }

    /// Overwrites four bytes at `x` with `value`.
    ///
    /// Used to patch a length prefix once the payload size is known.
    ///
    /// # Panics
    ///
    /// Panics if `x + 4` is past the written data.
    pub fn set_u32(&mut self, x: usize, value: u32) {
        self.uint8[x..x + 4].copy_from_slice(&value.to_be_bytes());
    }
}
