use std::fmt;

use serde::Serialize;

/// Where a [`DaapClient`](crate::DaapClient) is in its session lifecycle.
///
/// ```text
/// Disconnected | Error --login--> Connecting --> Connected --> HasSession --update--> HasRevision
/// any state    --logout--> Disconnected
/// any request failure  --> Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Disconnected,
    Connecting,
    Connected,
    HasSession,
    HasRevision,
    Error,
}

impl Status {
    /// Whether listings may be requested.
    pub fn is_ready(self) -> bool {
        self == Status::HasRevision
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
