//! The session state machine.

use std::sync::Arc;
use std::time::Duration;

use daap_dmap::{ContentCode, ContentCodes};
use log::{debug, warn};

use crate::record::{Database, Playlist, RecordContext, RecordKind, Song};
use crate::{ClientConfig, DaapError, Listing, Request, Response, ServerInfo, Status, Transport};

const LOGIN_URL: &str = "login";
const LOGOUT_URL: &str = "logout";
const UPDATE_URL: &str = "update";
const SERVER_INFO_URL: &str = "server-info";
const CONTENT_CODES_URL: &str = "content-codes";
const DATABASES_URL: &str = "databases";
const ITEMS_URL: &str = "items";
const PLAYLISTS_URL: &str = "containers";

/// `Accept` header value of every request.
pub const DMAP_MIME: &str = "application/x-dmap-tagged";

/// Sort keys the server understands. Anything else is dropped from the
/// request.
pub const SORT_KEYS: &[&str] = &["name", "album", "artist", "releasedate"];

/// Parameters of [`DaapClient::items`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsQuery {
    pub db_id: u32,
    /// One of [`SORT_KEYS`].
    pub sort: Option<String>,
}

impl Default for ItemsQuery {
    fn default() -> Self {
        Self { db_id: 1, sort: None }
    }
}

impl ItemsQuery {
    pub fn new(db_id: u32) -> Self {
        Self { db_id, sort: None }
    }

    pub fn sort(mut self, key: impl Into<String>) -> Self {
        self.sort = Some(key.into());
        self
    }
}

/// A DAAP client session.
///
/// Every operation issues at most one request through the transport and
/// returns once it has completed. Session and revision ids are threaded
/// into later requests; the content code table decodes every response and
/// is replaced whole by [`update_content_codes`](Self::update_content_codes).
///
/// A failed request, or a response that is not a DMAP tree, moves the
/// client to [`Status::Error`], from which [`login`](Self::login) may be
/// retried.
pub struct DaapClient<T> {
    transport: T,
    config: ClientConfig,
    base_url: String,
    credentials: Option<String>,
    status: Status,
    session_id: Option<i64>,
    revision_id: Option<i64>,
    codes: Arc<ContentCodes>,
}

impl<T: Transport> DaapClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            transport,
            base_url: config.base_url(),
            credentials: config.credentials(),
            config,
            status: Status::Disconnected,
            session_id: None,
            revision_id: None,
            codes: Arc::new(ContentCodes::bootstrap()),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn session_id(&self) -> Option<i64> {
        self.session_id
    }

    pub fn revision_id(&self) -> Option<i64> {
        self.revision_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The table responses are currently decoded with.
    pub fn content_codes(&self) -> &Arc<ContentCodes> {
        &self.codes
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Points the client at another server. `None` restores the default
    /// server or port.
    pub fn set_server(&mut self, server: Option<&str>, port: Option<u16>) {
        let defaults = ClientConfig::default();
        self.config.server = server.map_or(defaults.server, str::to_owned);
        self.config.port = port.unwrap_or(defaults.port);
        self.base_url = self.config.base_url();
    }

    pub fn set_password(&mut self, password: Option<&str>) {
        self.config.password = password.map(str::to_owned);
        self.credentials = self.config.credentials();
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    }

    /// Opens a session and fetches the first revision.
    ///
    /// Allowed from [`Status::Disconnected`] and [`Status::Error`]. A
    /// `password` replaces the configured one before the request is made.
    /// A call rejected for its state leaves the password untouched.
    pub fn login(&mut self, password: Option<&str>) -> Result<(), DaapError> {
        self.require(&[Status::Disconnected, Status::Error], "login")?;
        if password.is_some() {
            self.set_password(password);
        }

        self.transition(Status::Connecting);
        let response = self.request(format!("{}{LOGIN_URL}", self.base_url))?;
        self.transition(Status::Connected);

        let session_id = self.required_int(&response, "mlid")?;
        self.session_id = Some(session_id);
        self.transition(Status::HasSession);
        self.update()
    }

    /// Fetches the current library revision.
    pub fn update(&mut self) -> Result<(), DaapError> {
        self.require(&[Status::HasSession, Status::HasRevision], "update")?;

        let url = format!("{}{UPDATE_URL}?{}", self.base_url, self.session_query());
        let response = self.request(url)?;
        let revision_id = self.required_int(&response, "musr")?;
        self.revision_id = Some(revision_id);
        self.transition(Status::HasRevision);
        Ok(())
    }

    /// Ends the session. Does nothing when already disconnected.
    ///
    /// The response body is ignored. Without a session id (a login that
    /// failed before `mlid` was read) there is nothing to close, so no
    /// request is made.
    pub fn logout(&mut self) -> Result<(), DaapError> {
        if self.status == Status::Disconnected {
            return Ok(());
        }
        if self.session_id.is_some() {
            let url = format!("{}{LOGOUT_URL}?{}", self.base_url, self.session_query());
            self.fetch(&url)?;
        }
        self.session_id = None;
        self.revision_id = None;
        self.transition(Status::Disconnected);
        Ok(())
    }

    pub fn databases(&mut self) -> Result<Listing<Database>, DaapError> {
        self.require(&[Status::HasRevision], "databases")?;
        let url = self.listing_url(DATABASES_URL, Database::META);
        self.listing(url, None)
    }

    pub fn playlists(&mut self, db_id: u32) -> Result<Listing<Playlist>, DaapError> {
        self.require(&[Status::HasRevision], "playlists")?;
        let path = format!("{DATABASES_URL}/{db_id}/{PLAYLISTS_URL}");
        let url = self.listing_url(&path, Playlist::META);
        self.listing(url, Some(db_id))
    }

    /// Lists the songs of a database.
    ///
    /// A sort key outside [`SORT_KEYS`] is left out of the request.
    pub fn items(&mut self, query: &ItemsQuery) -> Result<Listing<Song>, DaapError> {
        self.require(&[Status::HasRevision], "items")?;
        let path = format!("{DATABASES_URL}/{}/{ITEMS_URL}", query.db_id);
        let mut url = self.listing_url(&path, Song::META);
        if let Some(sort) = &query.sort {
            if SORT_KEYS.contains(&sort.as_str()) {
                url.push_str("&sort=");
                url.push_str(sort);
            } else {
                debug!("dropping unknown sort key {sort:?}");
            }
        }
        self.listing(url, Some(query.db_id))
    }

    /// Reads the server's name and protocol versions. Needs no session.
    pub fn server_info(&mut self) -> Result<ServerInfo, DaapError> {
        let response = self.request(format!("{}{SERVER_INFO_URL}", self.base_url))?;
        ServerInfo::from_tag(&mut response.root())
            .map_err(|err| DaapError::decoding(response.url(), err))
    }

    /// Replaces the content code table with the one the server advertises.
    ///
    /// The current table is kept when the response has no `mdcl` entries.
    /// Responses already decoded keep reading with the table they were
    /// decoded with.
    pub fn update_content_codes(&mut self) -> Result<(), DaapError> {
        let response = self.request(format!("{}{CONTENT_CODES_URL}", self.base_url))?;
        match ContentCodes::from_dictionary(&mut response.root()) {
            Some(codes) => {
                debug!("installing {} content codes", codes.len());
                self.codes = Arc::new(codes);
            }
            None => debug!("no dictionary in {}, keeping current content codes", response.url()),
        }
        Ok(())
    }

    fn require(&self, allowed: &[Status], operation: &'static str) -> Result<(), DaapError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(DaapError::InvalidState {
                status: self.status,
                operation,
            })
        }
    }

    fn transition(&mut self, to: Status) {
        debug!("status {} -> {to}", self.status);
        self.status = to;
    }

    fn fail(&mut self, err: DaapError) -> DaapError {
        warn!("{err}");
        self.transition(Status::Error);
        err
    }

    fn session_query(&self) -> String {
        match self.session_id {
            Some(id) => format!("session-id={id}"),
            None => "session-id=".to_owned(),
        }
    }

    fn listing_url(&self, path: &str, meta: &[&str]) -> String {
        let mut url = format!("{}{path}?{}", self.base_url, self.session_query());
        if let Some(revision) = self.revision_id {
            url.push_str(&format!("&revision-id={revision}"));
        }
        if !meta.is_empty() {
            url.push_str("&meta=");
            url.push_str(&meta.join(","));
        }
        url
    }

    fn listing<K: RecordKind>(&mut self, url: String, db_id: Option<u32>) -> Result<Listing<K>, DaapError> {
        let response = self.request(url)?;
        let context = RecordContext {
            base_url: self.base_url.clone(),
            session_id: self.session_id.unwrap_or_default(),
            db_id,
        };
        Ok(Listing::new(response, context))
    }

    fn build_request(&self, url: &str) -> Request {
        let mut headers = vec![("Accept".to_owned(), DMAP_MIME.to_owned())];
        if let Some(credentials) = &self.credentials {
            headers.push(("Authorization".to_owned(), format!("Basic {credentials}")));
        }
        Request {
            url: url.to_owned(),
            headers,
            timeout: self.config.timeout(),
        }
    }

    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, DaapError> {
        let request = self.build_request(url);
        debug!("GET {url}");
        self.transport
            .get(&request)
            .map_err(|err| self.fail(err.into()))
    }

    /// Fetches `url` and checks the body decodes to a valid top-level tag.
    fn request(&mut self, url: String) -> Result<Response, DaapError> {
        let body = self.fetch(&url)?;
        let reason = match Response::new(url.clone(), body, Arc::clone(&self.codes)) {
            Ok(response) => return Ok(response),
            Err(err) => err.to_string(),
        };
        Err(self.fail(DaapError::Decode { url, reason }))
    }

    /// Reads an integer the session cannot proceed without.
    ///
    /// The field is normally a child of the top-level tag; a response that
    /// is just the field itself is accepted as well.
    fn required_int(&mut self, response: &Response, code: &str) -> Result<i64, DaapError> {
        let mut root = response.root();
        let wanted = ContentCode::try_from(code).ok();
        let found = if wanted.is_some() && root.name() == wanted {
            root.value()
        } else {
            root.get(code)
        };
        let err = match found {
            Ok(Some(value)) => match value.as_i64() {
                Some(n) => return Ok(n),
                None => DaapError::Decode {
                    url: response.url().to_owned(),
                    reason: format!("{code} is not an integer"),
                },
            },
            Ok(None) => DaapError::Decode {
                url: response.url().to_owned(),
                reason: format!("missing {code}"),
            },
            Err(err) => DaapError::decoding(response.url(), err),
        };
        Err(self.fail(err))
    }
}
