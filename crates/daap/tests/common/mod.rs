#![allow(dead_code)]

use daap::dmap::DmapEncoder;
use daap::{ClientConfig, DaapClient, Request, RequestError, RequestErrorKind, Transport};

enum Reply {
    Body(Vec<u8>),
    Fail(RequestErrorKind),
}

/// In-memory server answering by request path (no query string).
/// Unknown paths answer 404. Every request is recorded.
#[derive(Default)]
pub struct ScriptedServer {
    routes: Vec<(String, Reply)>,
    pub requests: Vec<Request>,
}

impl ScriptedServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A server that accepts a login and an update.
    pub fn with_session(session_id: i32, revision_id: i32) -> Self {
        Self::new()
            .route("login", login_body(session_id))
            .route("update", update_body(revision_id))
    }

    pub fn route(mut self, path: &str, body: Vec<u8>) -> Self {
        self.set(path, Reply::Body(body));
        self
    }

    pub fn fail(mut self, path: &str, kind: RequestErrorKind) -> Self {
        self.set(path, Reply::Fail(kind));
        self
    }

    /// Replaces a route on a server a client already owns.
    pub fn reroute(&mut self, path: &str, body: Vec<u8>) {
        self.set(path, Reply::Body(body));
    }

    pub fn refuse(&mut self, path: &str, kind: RequestErrorKind) {
        self.set(path, Reply::Fail(kind));
    }

    fn set(&mut self, path: &str, reply: Reply) {
        self.routes.retain(|(p, _)| p != path);
        self.routes.push((path.to_owned(), reply));
    }

    /// Paths requested so far, in order.
    pub fn paths(&self) -> Vec<&str> {
        self.requests.iter().map(|r| path_of(&r.url)).collect()
    }

    pub fn last_url(&self) -> &str {
        self.requests.last().map_or("", |r| r.url.as_str())
    }
}

impl Transport for ScriptedServer {
    fn get(&mut self, request: &Request) -> Result<Vec<u8>, RequestError> {
        self.requests.push(request.clone());
        let path = path_of(&request.url);
        match self.routes.iter().find(|(p, _)| p == path) {
            Some((_, Reply::Body(body))) => Ok(body.clone()),
            Some((_, Reply::Fail(kind))) => Err(RequestError::new(&request.url, kind.clone())),
            None => Err(RequestError::new(&request.url, RequestErrorKind::Status(404))),
        }
    }
}

/// `http://host:port/databases/1/items?x=y` -> `databases/1/items`
pub fn path_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = rest.split_once('/').map_or("", |(_, path)| path);
    path.split_once('?').map_or(path, |(path, _)| path)
}

pub fn client(server: ScriptedServer) -> DaapClient<ScriptedServer> {
    DaapClient::new(ClientConfig::default(), server)
}

/// A client that has completed login and update.
pub fn logged_in(server: ScriptedServer) -> DaapClient<ScriptedServer> {
    let mut client = client(server);
    client.login(None).unwrap();
    client
}

pub fn login_body(session_id: i32) -> Vec<u8> {
    let mut e = DmapEncoder::new();
    e.container("mlog", |e| {
        e.i32("mstt", 200);
        e.i32("mlid", session_id);
    });
    e.flush()
}

pub fn update_body(revision_id: i32) -> Vec<u8> {
    let mut e = DmapEncoder::new();
    e.container("mupd", |e| {
        e.i32("mstt", 200);
        e.i32("musr", revision_id);
    });
    e.flush()
}

pub fn databases_body() -> Vec<u8> {
    let mut e = DmapEncoder::new();
    e.container("avdb", |e| {
        e.i32("mstt", 200);
        e.i8("muty", 0);
        e.i32("mtco", 1);
        e.i32("mrco", 1);
        e.container("mlcl", |e| {
            e.container("mlit", |e| {
                e.i32("miid", 1);
                e.u64("mper", 0x0102_0304_0506_0708);
                e.string("minm", "Living Room");
                e.i32("mimc", 5);
                e.i32("mctc", 2);
            });
        });
    });
    e.flush()
}

pub fn playlists_body() -> Vec<u8> {
    let mut e = DmapEncoder::new();
    e.container("aply", |e| {
        e.i32("mstt", 200);
        e.i8("muty", 0);
        e.i32("mtco", 2);
        e.i32("mrco", 2);
        e.container("mlcl", |e| {
            e.container("mlit", |e| {
                e.i32("miid", 10);
                e.u64("mper", 0xdead_beef_0000_002a);
                e.string("minm", "Living Room");
                e.bool("abpl", true);
                e.i32("mimc", 5);
            });
            e.container("mlit", |e| {
                e.i32("miid", 11);
                e.string("minm", "Recently Played");
                e.bool("aeSP", true);
                e.i32("mpco", 10);
                e.i32("mimc", 3);
            });
        });
    });
    e.flush()
}

/// `count` songs named `Track 1`.., ids starting at 100.
pub fn songs_body(count: i32) -> Vec<u8> {
    let mut e = DmapEncoder::new();
    e.container("adbs", |e| {
        e.i32("mstt", 200);
        e.i8("muty", 0);
        e.i32("mtco", count);
        e.i32("mrco", count);
        e.container("mlcl", |e| {
            for n in 1..=count {
                e.container("mlit", |e| {
                    e.i32("miid", 99 + n);
                    e.string("minm", &format!("Track {n}"));
                    e.string("asfm", "mp3");
                    e.string("asar", "Miles Davis");
                    e.i16("astn", n as i16);
                });
            }
        });
    });
    e.flush()
}

pub fn server_info_body() -> Vec<u8> {
    let mut e = DmapEncoder::new();
    e.container("msrv", |e| {
        e.i32("mstt", 200);
        e.version("mpro", &[0, 2, 0, 10]);
        e.version("apro", &[0, 3, 0, 12]);
        e.string("minm", "Jukebox");
        e.bool("mslr", true);
        e.i32("mstm", 1800);
        e.i32("msdc", 1);
    });
    e.flush()
}

/// A content code dictionary with one `mdcl` per `(code, name, type)`.
pub fn content_codes_body(entries: &[(&str, &str, i16)]) -> Vec<u8> {
    let mut e = DmapEncoder::new();
    e.container("mccr", |e| {
        e.i32("mstt", 200);
        for (code, name, ty) in entries {
            e.container("mdcl", |e| {
                e.string("mcnm", code);
                e.string("mcna", name);
                e.i16("mcty", *ty);
            });
        }
    });
    e.flush()
}
