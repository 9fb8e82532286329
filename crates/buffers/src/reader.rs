//! Binary buffer reader with cursor tracking.

use crate::BufferError;

/// A binary buffer reader that reads big-endian data from a byte slice.
///
/// The reader keeps a cursor into the *whole* slice, so offsets stay
/// absolute no matter where reading starts. Every read checks the end
/// position first and leaves the cursor untouched on failure.
///
/// # Example
///
/// ```
/// use daap_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u16().unwrap(), 0x0203);
/// assert!(reader.u16().is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Creates a reader positioned at `x`, bounded by `end`.
    ///
    /// `end` is clamped to the slice length.
    pub fn from_slice(uint8: &'a [u8], x: usize, end: usize) -> Self {
        Self {
            uint8,
            x,
            end: end.min(uint8.len()),
        }
    }

    /// Creates a reader positioned at `x` and bounded by the slice end.
    pub fn at(uint8: &'a [u8], x: usize) -> Self {
        Self { x, ..Self::new(uint8) }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.x)
    }

    /// Fails when fewer than `n` bytes remain, including when the cursor
    /// already sits past `end` (even for `n == 0`).
    fn assert_size(&self, n: usize) -> Result<(), BufferError> {
        if self.x > self.end || n > self.size() {
            return Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed: n,
                available: self.end,
            });
        }
        Ok(())
    }

    /// Advances the cursor by the given number of bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.assert_size(length)?;
        self.x += length;
        Ok(())
    }

    /// Returns a subarray of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.assert_size(size)?;
        let x = self.x;
        self.x += size;
        Ok(&self.uint8[x..x + size])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let bytes = self.buf(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        Ok(self.array::<1>()?[0])
    }

    /// Reads a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        Ok(i8::from_be_bytes(self.array()?))
    }

    /// Reads an unsigned 16-bit integer (big-endian).
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    /// Reads a signed 16-bit integer (big-endian).
    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        Ok(i16::from_be_bytes(self.array()?))
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    /// Reads a signed 32-bit integer (big-endian).
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    /// Reads a four byte tag name.
    pub fn name(&mut self) -> Result<[u8; 4], BufferError> {
        self.array()
    }
}
