//! Typed views over `mlit` listing items.

use std::fmt;
use std::marker::PhantomData;

use daap_dmap::{DmapError, Tag, Value};
use serde_json::{Map, Value as JsonValue};

/// One kind of listing item: which fields it projects and which fields the
/// client asks the server to include.
pub trait RecordKind {
    /// Friendly field name to content code.
    const FIELDS: &'static [(&'static str, &'static str)];
    /// Dotted field names sent in the request's `meta` parameter.
    const META: &'static [&'static str];
}

#[derive(Debug, Clone, Copy)]
pub enum Database {}

#[derive(Debug, Clone, Copy)]
pub enum Playlist {}

#[derive(Debug, Clone, Copy)]
pub enum Song {}

impl RecordKind for Database {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("id", "miid"),
        ("name", "minm"),
        ("item_count", "mimc"),
        ("playlist_count", "mctc"),
    ];
    const META: &'static [&'static str] = &[];
}

impl RecordKind for Playlist {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("id", "miid"),
        ("name", "minm"),
        ("item_count", "mimc"),
        ("persistent_id", "mper"),
        ("parent_id", "mpco"),
        ("base_playlist", "abpl"),
        ("smart_playlist", "aeSP"),
        ("special_playlist", "aePS"),
    ];
    const META: &'static [&'static str] = &[
        "dmap.itemid",
        "dmap.itemname",
        "dmap.itemcount",
        "dmap.persistentid",
        "dmap.parentcontainerid",
        "daap.baseplaylist",
        "com.apple.itunes.special-playlist",
        "com.apple.itunes.smart-playlist",
    ];
}

impl RecordKind for Song {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("id", "miid"),
        ("name", "minm"),
        ("format", "asfm"),
        ("url", "asul"),
        ("album", "asal"),
        ("artist", "asar"),
        ("compilation", "asco"),
        ("genre", "asgn"),
        ("description", "asdt"),
        ("comment", "ascm"),
        ("disc_number", "asdn"),
        ("disc_count", "asdc"),
        ("track_number", "astn"),
        ("track_count", "astc"),
        ("bitrate", "asbr"),
        ("size", "assz"),
        ("year", "asyr"),
        ("duration", "astm"),
    ];
    const META: &'static [&'static str] = &[
        "dmap.itemid",
        "dmap.itemname",
        "daap.songalbum",
        "daap.songartist",
        "daap.songbitrate",
        "daap.songcomment",
        "daap.songcompilation",
        "daap.songcomposer",
        "daap.songdataurl",
        "daap.songdateadded",
        "daap.songdatemodified",
        "daap.songdescription",
        "daap.songdisccount",
        "daap.songdiscnumber",
        "daap.songformat",
        "daap.songgenre",
        "daap.songsize",
        "daap.songtime",
        "daap.songtracknumber",
        "daap.songtrackcount",
        "daap.songyear",
    ];
}

/// Session details a listing's records need to build URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordContext {
    pub base_url: String,
    pub session_id: i64,
    /// The database a song or playlist listing came from.
    pub db_id: Option<u32>,
}

/// One listing item, read lazily through its tag.
///
/// Field lookups go through the tag's child cache, so reading every field
/// of a record scans its children once.
pub struct Record<'a, K> {
    tag: Tag<'a>,
    context: &'a RecordContext,
    kind: PhantomData<K>,
}

impl<'a, K: RecordKind> Record<'a, K> {
    pub(crate) fn new(tag: Tag<'a>, context: &'a RecordContext) -> Self {
        Self {
            tag,
            context,
            kind: PhantomData,
        }
    }

    pub fn tag(&self) -> &Tag<'a> {
        &self.tag
    }

    /// Reads a child by content code.
    pub fn get(&mut self, code: &str) -> Result<Option<Value<'a>>, DmapError> {
        self.tag.get(code)
    }

    /// Reads a child by friendly field name. Names outside this kind's
    /// field table read as `None`.
    pub fn field(&mut self, name: &str) -> Result<Option<Value<'a>>, DmapError> {
        match K::FIELDS.iter().find(|(field, _)| *field == name) {
            Some((_, code)) => self.tag.get(code),
            None => Ok(None),
        }
    }

    /// Every field of the table as a JSON object. Missing fields, and
    /// fields the active content codes do not know, are `null`.
    pub fn to_json(&mut self) -> JsonValue {
        let mut map = Map::new();
        for (field, code) in K::FIELDS {
            let value = match self.tag.get(code) {
                Ok(Some(value)) => value.to_json(),
                _ => JsonValue::Null,
            };
            map.insert((*field).to_owned(), value);
        }
        JsonValue::Object(map)
    }

    pub fn id(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("miid")
    }

    pub fn name(&mut self) -> Result<Option<String>, DmapError> {
        self.text("minm")
    }

    fn int(&mut self, code: &str) -> Result<Option<i64>, DmapError> {
        Ok(self.tag.get(code)?.and_then(|v| v.as_i64()))
    }

    fn text(&mut self, code: &str) -> Result<Option<String>, DmapError> {
        Ok(self.tag.get(code)?.and_then(|v| v.as_str().map(str::to_owned)))
    }

    fn flag(&mut self, code: &str) -> Result<bool, DmapError> {
        Ok(self.tag.get(code)?.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

impl Record<'_, Database> {
    pub fn item_count(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("mimc")
    }

    pub fn playlist_count(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("mctc")
    }
}

impl Record<'_, Playlist> {
    /// Low 32 bits of the 64-bit persistent id.
    pub fn persistent_id(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("mper")
    }

    pub fn parent_id(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("mpco")
    }

    pub fn item_count(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("mimc")
    }

    /// The library's master playlist.
    pub fn is_base(&mut self) -> Result<bool, DmapError> {
        self.flag("abpl")
    }

    pub fn is_smart(&mut self) -> Result<bool, DmapError> {
        self.flag("aeSP")
    }

    pub fn is_special(&mut self) -> Result<bool, DmapError> {
        self.flag("aePS")
    }
}

impl Record<'_, Song> {
    /// File extension of the stream, e.g. `mp3`.
    pub fn format(&mut self) -> Result<Option<String>, DmapError> {
        self.text("asfm")
    }

    /// `{base}databases/{db}/items/{id}.{format}?session-id={session}`.
    ///
    /// `None` when the song has no id or no format.
    pub fn stream_url(&mut self) -> Result<Option<String>, DmapError> {
        let (Some(id), Some(format)) = (self.id()?, self.format()?) else {
            return Ok(None);
        };
        let ctx = self.context;
        Ok(Some(format!(
            "{}databases/{}/items/{id}.{format}?session-id={}",
            ctx.base_url,
            ctx.db_id.unwrap_or(1),
            ctx.session_id
        )))
    }

    /// Location of a remote stream, for songs that are not local files.
    pub fn url(&mut self) -> Result<Option<String>, DmapError> {
        self.text("asul")
    }

    pub fn album(&mut self) -> Result<Option<String>, DmapError> {
        self.text("asal")
    }

    pub fn artist(&mut self) -> Result<Option<String>, DmapError> {
        self.text("asar")
    }

    pub fn genre(&mut self) -> Result<Option<String>, DmapError> {
        self.text("asgn")
    }

    pub fn description(&mut self) -> Result<Option<String>, DmapError> {
        self.text("asdt")
    }

    pub fn comment(&mut self) -> Result<Option<String>, DmapError> {
        self.text("ascm")
    }

    pub fn is_compilation(&mut self) -> Result<bool, DmapError> {
        self.flag("asco")
    }

    pub fn disc_number(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("asdn")
    }

    pub fn disc_count(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("asdc")
    }

    pub fn track_number(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("astn")
    }

    pub fn track_count(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("astc")
    }

    /// Kilobits per second.
    pub fn bitrate(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("asbr")
    }

    /// Bytes.
    pub fn size(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("assz")
    }

    pub fn year(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("asyr")
    }

    /// Milliseconds.
    pub fn duration(&mut self) -> Result<Option<i64>, DmapError> {
        self.int("astm")
    }
}

impl<K> fmt::Debug for Record<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("kind", &std::any::type_name::<K>())
            .field("tag", &self.tag)
            .finish()
    }
}
