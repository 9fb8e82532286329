//! Listing responses (`mlcl` of `mlit` items) and their cursor.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use daap_dmap::{ContentCode, Tag};

use crate::record::{Record, RecordContext, RecordKind};
use crate::Response;

const LISTING: ContentCode = ContentCode::new(*b"mlcl");
const LISTING_ITEM: ContentCode = ContentCode::new(*b"mlit");

/// A decoded listing response: databases, playlists or songs.
///
/// Records borrow the response, so they are read through a [`Cursor`]
/// obtained from [`Listing::cursor`]. Each call starts a new cursor at the
/// first item.
pub struct Listing<K> {
    response: Response,
    context: RecordContext,
    kind: PhantomData<K>,
}

impl<K: RecordKind> Listing<K> {
    pub(crate) fn new(response: Response, context: RecordContext) -> Self {
        Self {
            response,
            context,
            kind: PhantomData,
        }
    }

    /// Number of items the server says it returned (`mrco`).
    pub fn len(&self) -> Option<usize> {
        self.count("mrco")
    }

    /// Number of items matching the request (`mtco`), which can exceed
    /// [`len`](Self::len) for paged responses.
    pub fn total(&self) -> Option<usize> {
        self.count("mtco")
    }

    /// Whether a new cursor would yield no record.
    pub fn is_empty(&self) -> bool {
        self.cursor().next().is_none()
    }

    /// A cursor positioned at the first item.
    pub fn cursor(&self) -> Cursor<'_, K> {
        let first = self.response.root().find_code(LISTING).first_child();
        Cursor {
            next: first,
            context: &self.context,
            kind: PhantomData,
        }
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn context(&self) -> &RecordContext {
        &self.context
    }

    fn count(&self, code: &str) -> Option<usize> {
        let value = self.response.root().get(code).ok().flatten()?;
        value.as_i64().and_then(|n| usize::try_from(n).ok())
    }
}

impl<K> fmt::Debug for Listing<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listing")
            .field("kind", &std::any::type_name::<K>())
            .field("url", &self.response.url())
            .field("context", &self.context)
            .finish()
    }
}

/// Forward-only position in a listing.
///
/// [`Cursor::get`] and the [`Iterator`] impl advance the same position:
/// items taken by one are not seen again by the other. Children of `mlcl`
/// that are not `mlit` are skipped.
pub struct Cursor<'a, K> {
    next: Tag<'a>,
    context: &'a RecordContext,
    kind: PhantomData<K>,
}

impl<'a, K: RecordKind> Cursor<'a, K> {
    /// Takes up to `max` items, or every remaining item without a limit.
    pub fn get(&mut self, max: Option<usize>) -> Vec<Record<'a, K>> {
        match max {
            Some(max) => self.by_ref().take(max).collect(),
            None => self.by_ref().collect(),
        }
    }

    /// The tag the next item will be read from; invalid once exhausted.
    pub fn position(&self) -> &Tag<'a> {
        &self.next
    }
}

impl<'a, K: RecordKind> Iterator for Cursor<'a, K> {
    type Item = Record<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next.is_valid() {
            let tag = self.next.clone();
            self.next = tag.next_sibling();
            if tag.name() == Some(LISTING_ITEM) {
                return Some(Record::new(tag, self.context));
            }
        }
        None
    }
}

impl<K: RecordKind> FusedIterator for Cursor<'_, K> {}
