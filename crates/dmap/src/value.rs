//! Decoded tag values.

use daap_buffers::{BufferError, Reader};
use serde_json::Value as JsonValue;

use crate::{DecodeKind, DmapError, Tag};

/// The result of [`Tag::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    /// Low-order 32 bits of a 64-bit field (either signedness).
    ///
    /// DAAP clients have always read 8-byte fields this way; persistent ids
    /// compared against other clients only match if the truncation is kept.
    Long(u32),
    Str(String),
    /// Seconds since the unix epoch.
    Date(u32),
    Version(String),
    Bool(bool),
    /// The tag itself, for further `find`/`get` calls. May be invalid.
    Container(Tag<'a>),
}

impl<'a> Value<'a> {
    /// Widens any integer-like value.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v.into()),
            Value::UInt8(v) => Some(v.into()),
            Value::Int16(v) => Some(v.into()),
            Value::UInt16(v) => Some(v.into()),
            Value::Int32(v) => Some(v.into()),
            Value::UInt32(v) | Value::Long(v) | Value::Date(v) => Some(v.into()),
            Value::Bool(v) => Some(v.into()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Version(s) => Some(s),
            _ => None,
        }
    }

    /// True for a decoded boolean or for an integer equal to 1.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            other => other.as_i64().map(|v| v == 1),
        }
    }

    pub fn into_tag(self) -> Option<Tag<'a>> {
        match self {
            Value::Container(tag) => Some(tag),
            _ => None,
        }
    }

    /// Converts a scalar to JSON. Containers become `null`; use
    /// [`crate::tag_to_json`] to expand them.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Str(s) | Value::Version(s) => JsonValue::from(s.as_str()),
            Value::Bool(v) => JsonValue::from(*v),
            Value::Container(_) => JsonValue::Null,
            other => other.as_i64().map(JsonValue::from).unwrap_or(JsonValue::Null),
        }
    }
}

/// Decodes the payload of `tag` as `kind`.
///
/// Returns `Ok(None)` for an invalid tag and [`Value::Container`] for
/// container kinds. Reads are bounded by the whole response buffer, not by
/// the tag's declared length.
pub(crate) fn decode<'a>(tag: &Tag<'a>, kind: DecodeKind) -> Result<Option<Value<'a>>, DmapError> {
    let Some(data_offset) = tag.data_offset() else {
        return Ok(None);
    };
    let mut reader = Reader::at(tag.buffer(), data_offset);
    let truncated = |err: BufferError| match err {
        BufferError::EndOfBuffer {
            offset,
            needed,
            available,
        } => DmapError::Truncated {
            code: tag.name().map(|c| c.to_string()).unwrap_or_default(),
            offset,
            needed,
            available,
        },
    };
    let length = tag.length() as usize;

    let value = match kind {
        DecodeKind::Int8 => Value::Int8(reader.i8().map_err(truncated)?),
        DecodeKind::UInt8 => Value::UInt8(reader.u8().map_err(truncated)?),
        DecodeKind::Int16 => Value::Int16(reader.i16().map_err(truncated)?),
        DecodeKind::UInt16 => Value::UInt16(reader.u16().map_err(truncated)?),
        DecodeKind::Int32 => Value::Int32(reader.i32().map_err(truncated)?),
        DecodeKind::UInt32 => Value::UInt32(reader.u32().map_err(truncated)?),
        DecodeKind::Int64 | DecodeKind::UInt64 => {
            reader.skip(4).map_err(truncated)?;
            Value::Long(reader.u32().map_err(truncated)?)
        }
        DecodeKind::Date => Value::Date(reader.u32().map_err(truncated)?),
        DecodeKind::Boolean => Value::Bool(reader.u8().map_err(truncated)? == 1),
        DecodeKind::String => {
            Value::Str(crate::utf8::decode_utf8(reader.buf(length).map_err(truncated)?))
        }
        DecodeKind::Version => Value::Version(join_version(reader.buf(length).map_err(truncated)?)),
        DecodeKind::Container => Value::Container(tag.clone()),
    };
    Ok(Some(value))
}

/// Joins bytes as decimal integers with `.`: `[3, 1, 5, 0]` is `"3.1.5.0"`.
pub fn join_version(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(".")
}
