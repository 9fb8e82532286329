//! Decoder for DMAP, the tag-length-value format DAAP servers answer in.
//!
//! Every response is a tree of frames:
//!
//! ```text
//! tag               := name(4 bytes) length(u32, big-endian) payload(length bytes)
//! container payload := tag*
//! scalar payload    := per content type
//! ```
//!
//! The frames do not say whether a payload is a container or which scalar
//! type it holds. That comes from a [`ContentCodes`] table: a built-in
//! bootstrap table, replaced by whatever the server advertises in its
//! `content-codes` listing.
//!
//! # Overview
//!
//! - [`Tag`] - lazy, memoizing view of one frame in a borrowed buffer
//! - [`ContentCodes`] / [`DecodeKind`] - code to decoder table
//! - [`Value`] - decoded scalars, or a container tag
//! - [`DmapEncoder`] - writes frames, for fixtures and tooling
//! - [`dump`] - renders a buffer as JSON

mod code;
mod content_codes;
mod encoder;
mod error;
mod json;
mod tag;
mod utf8;
mod value;

pub use code::ContentCode;
pub use content_codes::{ContentCodeEntry, ContentCodes, DecodeKind};
pub use encoder::DmapEncoder;
pub use error::DmapError;
pub use json::{dump, tag_to_json, MAX_DUMP_DEPTH};
pub use tag::{Children, Tag, HEADER_LENGTH, NAME_LENGTH, SIZE_LENGTH};
pub use utf8::decode_utf8;
pub use value::{join_version, Value};
