//! Content code tables: which decoder applies to which tag.
//!
//! A fresh client decodes with [`ContentCodes::bootstrap`]. Once the server's
//! `content-codes` listing is fetched, [`ContentCodes::from_dictionary`]
//! builds a replacement table that is swapped in as a whole.

use indexmap::IndexMap;
use log::warn;

use crate::{ContentCode, Tag};

/// How a tag's payload is interpreted.
///
/// Numeric server type ids 1 through 12 map onto these kinds through
/// [`DecodeKind::from_type_id`]. [`DecodeKind::Boolean`] has no id of its
/// own; on the wire flags are single bytes (type 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeKind {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    /// Only the low-order 32 bits of the 8-byte payload are read.
    Int64,
    /// Only the low-order 32 bits of the 8-byte payload are read.
    UInt64,
    String,
    /// Seconds since the unix epoch, 4 bytes.
    Date,
    /// Every payload byte joined with `.`, e.g. `3.0.2.0`.
    Version,
    Boolean,
    /// Payload is a sequence of child tags.
    Container,
}

impl DecodeKind {
    /// Resolves a server-declared type id.
    pub fn from_type_id(id: i64) -> Option<Self> {
        Some(match id {
            1 => Self::Int8,
            2 => Self::UInt8,
            3 => Self::Int16,
            4 => Self::UInt16,
            5 => Self::Int32,
            6 => Self::UInt32,
            7 => Self::Int64,
            8 => Self::UInt64,
            9 => Self::String,
            10 => Self::Date,
            11 => Self::Version,
            12 => Self::Container,
            _ => return None,
        })
    }

    /// The wire type id for this kind.
    pub fn type_id(self) -> u16 {
        match self {
            Self::Int8 | Self::Boolean => 1,
            Self::UInt8 => 2,
            Self::Int16 => 3,
            Self::UInt16 => 4,
            Self::Int32 => 5,
            Self::UInt32 => 6,
            Self::Int64 => 7,
            Self::UInt64 => 8,
            Self::String => 9,
            Self::Date => 10,
            Self::Version => 11,
            Self::Container => 12,
        }
    }

    pub fn is_container(self) -> bool {
        self == Self::Container
    }
}

/// One row of a content code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCodeEntry {
    pub kind: DecodeKind,
    /// Dotted human name, e.g. `dmap.itemname`. Empty when the server left it out.
    pub name: String,
}

const BOOTSTRAP: &[(&[u8; 4], DecodeKind, &str)] = &[
    (b"apro", DecodeKind::Version, "daap.protocolversion"),
    (b"mpro", DecodeKind::Version, "dmap.protocolversion"),
    (b"mlid", DecodeKind::Int32, "dmap.sessionid"),
    (b"mstm", DecodeKind::Int32, "dmap.timeoutinterval"),
    (b"msdc", DecodeKind::Int32, "dmap.databasescount"),
    (b"mslr", DecodeKind::Boolean, "dmap.loginrequired"),
    (b"musr", DecodeKind::Int32, "dmap.serverrevision"),
    (b"mstt", DecodeKind::Int32, "dmap.status"),
    (b"muty", DecodeKind::Int8, "dmap.updatetype"),
    (b"mtco", DecodeKind::Int32, "dmap.specifiedtotalcount"),
    (b"mrco", DecodeKind::Int32, "dmap.returnedcount"),
    (b"miid", DecodeKind::Int32, "dmap.itemid"),
    (b"minm", DecodeKind::String, "dmap.itemname"),
    (b"mimc", DecodeKind::Int32, "dmap.itemcount"),
    (b"mctc", DecodeKind::Int32, "dmap.containercount"),
    (b"asfm", DecodeKind::String, "daap.songformat"),
    (b"asul", DecodeKind::String, "daap.songdataurl"),
    (b"asal", DecodeKind::String, "daap.songalbum"),
    (b"asar", DecodeKind::String, "daap.songartist"),
    (b"asco", DecodeKind::Boolean, "daap.songcompilation"),
    (b"asgn", DecodeKind::String, "daap.songgenre"),
    (b"asdt", DecodeKind::String, "daap.songdescription"),
    (b"ascm", DecodeKind::String, "daap.songcomment"),
    (b"asdn", DecodeKind::Int16, "daap.songdiscnumber"),
    (b"asdc", DecodeKind::Int16, "daap.songdisccount"),
    (b"astn", DecodeKind::Int16, "daap.songtracknumber"),
    (b"astc", DecodeKind::Int16, "daap.songtrackcount"),
    (b"asbr", DecodeKind::Int16, "daap.songbitrate"),
    (b"assz", DecodeKind::Int32, "daap.songsize"),
    (b"asyr", DecodeKind::Int16, "daap.songyear"),
    (b"astm", DecodeKind::Int32, "daap.songtime"),
    (b"mper", DecodeKind::Int64, "dmap.persistentid"),
    (b"mpco", DecodeKind::Int32, "dmap.parentcontainerid"),
    (b"abpl", DecodeKind::Boolean, "daap.baseplaylist"),
    (b"aeSP", DecodeKind::Boolean, "com.apple.itunes.smart-playlist"),
    (b"aePS", DecodeKind::Boolean, "com.apple.itunes.special-playlist"),
    (b"mcnm", DecodeKind::String, "dmap.contentcodesnumber"),
    (b"mcna", DecodeKind::String, "dmap.contentcodesname"),
    (b"mcty", DecodeKind::Int16, "dmap.contentcodestype"),
    (b"mlcl", DecodeKind::Container, "dmap.listing"),
    (b"mlit", DecodeKind::Container, "dmap.listingitem"),
    (b"mdcl", DecodeKind::Container, "dmap.dictionary"),
    (b"mlog", DecodeKind::Container, "dmap.loginresponse"),
    (b"mupd", DecodeKind::Container, "dmap.updateresponse"),
    (b"msrv", DecodeKind::Container, "dmap.serverinforesponse"),
    (b"mccr", DecodeKind::Container, "dmap.contentcodesresponse"),
    (b"avdb", DecodeKind::Container, "daap.serverdatabases"),
    (b"adbs", DecodeKind::Container, "daap.databasesongs"),
    (b"aply", DecodeKind::Container, "daap.databaseplaylists"),
];

/// Mapping from content code to decode kind.
///
/// Tables are never patched in place once handed to a client; a new
/// dictionary produces a new table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCodes {
    codes: IndexMap<ContentCode, ContentCodeEntry>,
}

impl Default for ContentCodes {
    fn default() -> Self {
        Self::bootstrap()
    }
}

impl ContentCodes {
    /// An empty table. Every `get` against it fails.
    pub fn empty() -> Self {
        Self {
            codes: IndexMap::new(),
        }
    }

    /// The built-in table used before the server's dictionary is known.
    pub fn bootstrap() -> Self {
        BOOTSTRAP
            .iter()
            .map(|&(code, kind, name)| {
                (
                    ContentCode::new(*code),
                    ContentCodeEntry {
                        kind,
                        name: name.to_owned(),
                    },
                )
            })
            .collect()
    }

    /// Builds a table from a `content-codes` response.
    ///
    /// Every `mdcl` child of `root` contributes one entry: the 4-byte code
    /// from `mcnm`, the human name from `mcna` and the type from `mcty`.
    /// These three fields are read straight from their payloads rather than
    /// through the active table, so a dictionary decodes the same way no
    /// matter which table is installed. Entries with an unknown type id or a
    /// malformed code are skipped.
    ///
    /// Returns `None` if `root` has no `mdcl` child at all.
    pub fn from_dictionary(root: &mut Tag<'_>) -> Option<Self> {
        let mut entry = root.find("mdcl");
        if !entry.is_valid() {
            return None;
        }

        let mut codes = Self::empty();
        let dictionary = ContentCode::new(*b"mdcl");
        while entry.is_valid() {
            if entry.name() == Some(dictionary) {
                if let Some((code, row)) = read_dictionary_entry(&mut entry) {
                    codes.codes.insert(code, row);
                }
            }
            entry = entry.next_sibling();
        }
        Some(codes)
    }

    /// Adds or replaces one entry, returning the previous kind.
    pub fn insert(
        &mut self,
        code: ContentCode,
        kind: DecodeKind,
        name: impl Into<String>,
    ) -> Option<DecodeKind> {
        self.codes
            .insert(
                code,
                ContentCodeEntry {
                    kind,
                    name: name.into(),
                },
            )
            .map(|previous| previous.kind)
    }

    /// Looks up a code given as a string. Strings that are not exactly four
    /// bytes never match.
    pub fn kind(&self, name: &str) -> Option<DecodeKind> {
        let code = ContentCode::try_from(name).ok()?;
        self.kind_of(&code)
    }

    pub fn kind_of(&self, code: &ContentCode) -> Option<DecodeKind> {
        self.codes.get(code).map(|entry| entry.kind)
    }

    pub fn entry(&self, code: &ContentCode) -> Option<&ContentCodeEntry> {
        self.codes.get(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in insertion order (server order for negotiated tables).
    pub fn iter(&self) -> impl Iterator<Item = (&ContentCode, &ContentCodeEntry)> {
        self.codes.iter()
    }
}

impl FromIterator<(ContentCode, ContentCodeEntry)> for ContentCodes {
    fn from_iter<T: IntoIterator<Item = (ContentCode, ContentCodeEntry)>>(iter: T) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}

fn read_dictionary_entry(entry: &mut Tag<'_>) -> Option<(ContentCode, ContentCodeEntry)> {
    let number = entry.find("mcnm");
    let code = match number.payload().map(<[u8; 4]>::try_from) {
        Some(Ok(bytes)) => ContentCode::new(bytes),
        _ => {
            warn!("skipping dictionary entry without a 4-byte mcnm");
            return None;
        }
    };

    let type_id = match entry.find("mcty").payload() {
        Some(&[hi, lo]) => i64::from(i16::from_be_bytes([hi, lo])),
        Some(&[b]) => i64::from(b),
        _ => {
            warn!("skipping dictionary entry {code} without mcty");
            return None;
        }
    };
    let Some(kind) = DecodeKind::from_type_id(type_id) else {
        warn!("skipping dictionary entry {code} with unknown type id {type_id}");
        return None;
    };

    let name = entry
        .find("mcna")
        .payload()
        .map(crate::utf8::decode_utf8)
        .unwrap_or_default();

    Some((code, ContentCodeEntry { kind, name }))
}
