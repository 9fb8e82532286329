//! Lazy view over one tag of a DMAP response.
//!
//! A response is a tree of `name(4) length(4, big-endian) payload` frames.
//! Nothing is decoded up front: a [`Tag`] is an offset into the borrowed
//! response buffer, and children are discovered by walking sibling headers
//! only as far as a lookup needs.

use std::collections::HashMap;
use std::fmt;

use daap_buffers::Reader;
use log::{trace, warn};

use crate::value::{self, Value};
use crate::{ContentCode, ContentCodes, DmapError};

pub const NAME_LENGTH: usize = 4;
pub const SIZE_LENGTH: usize = 4;
pub const HEADER_LENGTH: usize = NAME_LENGTH + SIZE_LENGTH;

/// Location of one tag inside the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    offset: usize,
    name: ContentCode,
    length: u32,
}

impl Header {
    fn data_offset(&self) -> usize {
        self.offset + HEADER_LENGTH
    }

    /// First byte after the payload.
    fn end(&self) -> usize {
        self.data_offset().saturating_add(self.length as usize)
    }
}

/// Reads the header at `offset`. `None` once `offset` reaches `limit` or the
/// header itself would cross it.
fn read_header(data: &[u8], offset: usize, limit: usize) -> Option<Header> {
    if offset >= limit {
        return None;
    }
    let mut reader = Reader::from_slice(data, offset, limit);
    match (reader.name(), reader.u32()) {
        (Ok(name), Ok(length)) => Some(Header {
            offset,
            name: ContentCode::new(name),
            length,
        }),
        _ => {
            warn!("tag header at offset {offset} runs past its container end {limit}");
            None
        }
    }
}

/// Scan state for memoized child lookups.
#[derive(Debug, Clone, Default)]
struct ChildIndex {
    /// Where the linear scan resumes.
    last_offset: usize,
    /// Children passed so far, first occurrence per name.
    seen: HashMap<ContentCode, Header>,
}

/// One tag of a decoded response, or the invalid sentinel.
///
/// Invalid tags stand for "not found" and "no more siblings". Every
/// operation on them succeeds and yields another invalid tag or `None`.
///
/// `find` memoizes: each child header is read at most once per `Tag`
/// instance, and lookups for different names share one forward scan.
/// The memo belongs to this instance only; tags handed out by `find` or
/// [`Tag::next_sibling`] start with an empty one.
#[derive(Clone)]
pub struct Tag<'a> {
    data: &'a [u8],
    codes: &'a ContentCodes,
    header: Option<Header>,
    /// End of the enclosing payload. Siblings never start at or past it.
    limit: usize,
    children: ChildIndex,
}

impl<'a> Tag<'a> {
    /// Decodes the tag whose header starts at `offset`.
    ///
    /// This is the entry point for a whole response, so unlike child
    /// lookups a missing or short header is an error.
    pub fn decode(data: &'a [u8], offset: usize, codes: &'a ContentCodes) -> Result<Self, DmapError> {
        let mut reader = Reader::at(data, offset);
        let header = match (reader.name(), reader.u32()) {
            (Ok(name), Ok(length)) => Header {
                offset,
                name: ContentCode::new(name),
                length,
            },
            _ => {
                return Err(DmapError::TruncatedHeader {
                    offset,
                    available: data.len(),
                })
            }
        };
        Ok(Self::from_header(data, codes, header, data.len()))
    }

    /// The sentinel tag: not anchored anywhere in `data`.
    pub fn invalid(data: &'a [u8], codes: &'a ContentCodes) -> Self {
        Self {
            data,
            codes,
            header: None,
            limit: 0,
            children: ChildIndex::default(),
        }
    }

    fn from_header(data: &'a [u8], codes: &'a ContentCodes, header: Header, limit: usize) -> Self {
        Self {
            data,
            codes,
            header: Some(header),
            limit,
            children: ChildIndex {
                last_offset: header.data_offset(),
                seen: HashMap::new(),
            },
        }
    }

    fn at(&self, offset: usize, limit: usize) -> Self {
        match read_header(self.data, offset, limit) {
            Some(header) => Self::from_header(self.data, self.codes, header, limit),
            None => Self::invalid(self.data, self.codes),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.header.is_some()
    }

    pub fn name(&self) -> Option<ContentCode> {
        self.header.map(|h| h.name)
    }

    /// Offset of the header in the response buffer.
    pub fn offset(&self) -> Option<usize> {
        self.header.map(|h| h.offset)
    }

    /// Offset of the first payload byte.
    pub fn data_offset(&self) -> Option<usize> {
        self.header.map(|h| h.data_offset())
    }

    /// Declared payload length; 0 for an invalid tag.
    pub fn length(&self) -> u32 {
        self.header.map_or(0, |h| h.length)
    }

    /// The payload bytes, if the tag is valid and its payload fits the buffer.
    pub fn payload(&self) -> Option<&'a [u8]> {
        let header = self.header?;
        self.data.get(header.data_offset()..header.end())
    }

    /// The whole response buffer this tag points into.
    pub fn buffer(&self) -> &'a [u8] {
        self.data
    }

    pub fn codes(&self) -> &'a ContentCodes {
        self.codes
    }

    /// End of this tag's payload, clamped to the buffer.
    fn child_limit(&self) -> usize {
        self.header
            .map_or(0, |h| h.end().min(self.data.len()))
    }

    /// The tag immediately after this one's payload.
    pub fn next_sibling(&self) -> Tag<'a> {
        match self.header {
            Some(header) => self.at(header.end(), self.limit),
            None => Self::invalid(self.data, self.codes),
        }
    }

    /// The sibling starting at an explicit `offset`.
    pub fn sibling_at(&self, offset: usize) -> Tag<'a> {
        if !self.is_valid() {
            return Self::invalid(self.data, self.codes);
        }
        self.at(offset, self.limit)
    }

    /// The first child, read as if this tag were a container.
    pub fn first_child(&self) -> Tag<'a> {
        match self.header {
            Some(header) => self.at(header.data_offset(), self.child_limit()),
            None => Self::invalid(self.data, self.codes),
        }
    }

    /// Every child in byte order, read as if this tag were a container.
    pub fn children(&self) -> Children<'a> {
        Children {
            next: self.first_child(),
        }
    }

    /// Finds the first immediate child called `name`.
    ///
    /// Cached children answer immediately. On a miss the scan resumes
    /// where the previous one stopped and records every child it passes,
    /// so any sequence of lookups reads each child header once.
    pub fn find(&mut self, name: &str) -> Tag<'a> {
        match ContentCode::try_from(name) {
            Ok(code) => self.find_code(code),
            Err(_) => Self::invalid(self.data, self.codes),
        }
    }

    pub fn find_code(&mut self, code: ContentCode) -> Tag<'a> {
        if !self.is_valid() {
            return Self::invalid(self.data, self.codes);
        }
        let limit = self.child_limit();
        if let Some(&header) = self.children.seen.get(&code) {
            return Self::from_header(self.data, self.codes, header, limit);
        }

        trace!("scanning for {code} from offset {}", self.children.last_offset);
        while let Some(child) = read_header(self.data, self.children.last_offset, limit) {
            self.children.last_offset = child.end();
            self.children.seen.entry(child.name).or_insert(child);
            if child.name == code {
                return Self::from_header(self.data, self.codes, child, limit);
            }
        }
        Self::invalid(self.data, self.codes)
    }

    /// Finds the child `name` and decodes it through the content code table.
    ///
    /// - unknown code: [`DmapError::UnknownContentCode`]
    /// - container code: the child tag itself as [`Value::Container`],
    ///   valid or not
    /// - scalar code: `None` if the child is missing, else its value
    pub fn get(&mut self, name: &str) -> Result<Option<Value<'a>>, DmapError> {
        let kind = self
            .codes
            .kind(name)
            .ok_or_else(|| DmapError::UnknownContentCode(name.to_owned()))?;
        let child = self.find(name);
        if kind.is_container() {
            return Ok(Some(Value::Container(child)));
        }
        value::decode(&child, kind)
    }

    /// Decodes this tag's own payload using its name's table entry.
    pub fn value(&self) -> Result<Option<Value<'a>>, DmapError> {
        let Some(code) = self.name() else {
            return Ok(None);
        };
        let kind = self
            .codes
            .kind_of(&code)
            .ok_or_else(|| DmapError::UnknownContentCode(code.to_string()))?;
        value::decode(self, kind)
    }
}

/// Tags are equal when they sit at the same place in the same buffer.
impl PartialEq for Tag<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data, other.data) && self.header == other.header
    }
}

impl fmt::Debug for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.header {
            Some(h) => f
                .debug_struct("Tag")
                .field("name", &h.name)
                .field("offset", &h.offset)
                .field("length", &h.length)
                .finish(),
            None => f.write_str("Tag(invalid)"),
        }
    }
}

/// Iterator over a tag's children, see [`Tag::children`].
pub struct Children<'a> {
    next: Tag<'a>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        if !self.next.is_valid() {
            return None;
        }
        let sibling = self.next.next_sibling();
        Some(std::mem::replace(&mut self.next, sibling))
    }
}
