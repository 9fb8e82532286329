//! Client for DAAP, the protocol iTunes-style music servers share their
//! libraries with.
//!
//! A [`DaapClient`] walks the session lifecycle (login, update, listings,
//! logout) over any [`Transport`], decoding each response with
//! [`daap_dmap`]:
//!
//! ```
//! use daap::dmap::DmapEncoder;
//! use daap::{ClientConfig, DaapClient, Request, RequestError, Status};
//!
//! let server = |request: &Request| -> Result<Vec<u8>, RequestError> {
//!     let mut e = DmapEncoder::new();
//!     if request.url.ends_with("/login") {
//!         e.container("mlog", |e| e.i32("mlid", 42));
//!     } else {
//!         e.container("mupd", |e| e.i32("musr", 7));
//!     }
//!     Ok(e.flush())
//! };
//!
//! let mut client = DaapClient::new(ClientConfig::default(), server);
//! client.login(None)?;
//! assert_eq!(client.status(), Status::HasRevision);
//! assert_eq!(client.session_id(), Some(42));
//! assert_eq!(client.revision_id(), Some(7));
//! # Ok::<(), daap::DaapError>(())
//! ```

mod client;
mod config;
mod error;
mod listing;
mod record;
mod response;
mod server_info;
mod status;
mod transport;

pub use daap_dmap as dmap;

pub use client::{DaapClient, ItemsQuery, DMAP_MIME, SORT_KEYS};
pub use config::{ClientConfig, DEFAULT_PORT, DEFAULT_SERVER, DEFAULT_TIMEOUT_MS};
pub use error::{DaapError, RequestError, RequestErrorKind};
pub use listing::{Cursor, Listing};
pub use record::{Database, Playlist, Record, RecordContext, RecordKind, Song};
pub use response::Response;
pub use server_info::ServerInfo;
pub use status::Status;
pub use transport::{Request, Transport};
