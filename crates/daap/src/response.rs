use std::sync::Arc;

use daap_dmap::{ContentCodes, DmapError, Tag};

/// A response body that decoded to a valid top-level tag.
///
/// The body is owned here and never modified, so every [`Tag`] handed out
/// by [`Response::root`] borrows from it. The content code table is the
/// one that was active when the request was made; replacing the client's
/// table later does not change how this response reads.
#[derive(Debug, Clone)]
pub struct Response {
    url: String,
    body: Vec<u8>,
    codes: Arc<ContentCodes>,
}

impl Response {
    pub(crate) fn new(url: String, body: Vec<u8>, codes: Arc<ContentCodes>) -> Result<Self, DmapError> {
        Tag::decode(&body, 0, &codes)?;
        Ok(Self { url, body, codes })
    }

    /// The top-level tag, with an empty lookup cache.
    pub fn root(&self) -> Tag<'_> {
        Tag::decode(&self.body, 0, &self.codes)
            .unwrap_or_else(|_| Tag::invalid(&self.body, &self.codes))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn codes(&self) -> &Arc<ContentCodes> {
        &self.codes
    }
}
