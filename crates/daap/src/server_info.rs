use daap_dmap::{DmapError, Tag};
use serde::Serialize;

/// The `server-info` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    /// `apro`, e.g. `3.0.2`.
    pub daap_version: Option<String>,
    /// `mpro`.
    pub dmap_version: Option<String>,
    pub name: Option<String>,
    /// Idle seconds before the server drops a session.
    pub timeout: Option<i64>,
    pub database_count: Option<i64>,
    pub login_required: Option<bool>,
}

impl ServerInfo {
    pub(crate) fn from_tag(root: &mut Tag<'_>) -> Result<Self, DmapError> {
        Ok(Self {
            daap_version: text(root, "apro")?,
            dmap_version: text(root, "mpro")?,
            name: text(root, "minm")?,
            timeout: int(root, "mstm")?,
            database_count: int(root, "msdc")?,
            login_required: root.get("mslr")?.and_then(|v| v.as_bool()),
        })
    }
}

fn text(root: &mut Tag<'_>, code: &str) -> Result<Option<String>, DmapError> {
    Ok(root.get(code)?.and_then(|v| v.as_str().map(str::to_owned)))
}

fn int(root: &mut Tag<'_>, code: &str) -> Result<Option<i64>, DmapError> {
    Ok(root.get(code)?.and_then(|v| v.as_i64()))
}
