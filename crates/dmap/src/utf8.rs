//! The string decoder DAAP servers have historically been read with.

/// Decodes string payloads with a three-case UTF-8 reader.
///
/// Lead bytes below 0x80 are ASCII, 0xC0..=0xDF start a 2-byte sequence,
/// and everything else is read as a 3-byte sequence. 4-byte sequences are
/// not recognised and come out as garbage, matching what existing DAAP
/// clients display. Continuation bytes missing at the end of the payload
/// read as zero. Code points that are not valid `char`s (lone surrogates)
/// become U+FFFD.
pub fn decode_utf8(bytes: &[u8]) -> String {
    let at = |i: usize| u32::from(bytes.get(i).copied().unwrap_or(0));
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let c = u32::from(bytes[i]);
        let (code, width) = if c < 0x80 {
            (c, 1)
        } else if (0xC0..0xE0).contains(&c) {
            (((c & 0x1F) << 6) | (at(i + 1) & 0x3F), 2)
        } else {
            (
                ((c & 0x0F) << 12) | ((at(i + 1) & 0x3F) << 6) | (at(i + 2) & 0x3F),
                3,
            )
        };
        out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
        i += width;
    }
    out
}
