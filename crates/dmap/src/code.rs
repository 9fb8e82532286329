//! Four byte content code identifiers.

use std::fmt;
use std::str::FromStr;

use crate::DmapError;

/// A four byte tag name such as `mlit` or `asal`.
///
/// Codes are plain bytes on the wire. They are almost always ASCII, but
/// nothing stops a server from sending other bytes, so display maps each
/// byte to the Latin-1 character of the same value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentCode([u8; 4]);

impl ContentCode {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl TryFrom<&str> for ContentCode {
    type Error = DmapError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let bytes: [u8; 4] = value
            .as_bytes()
            .try_into()
            .map_err(|_| DmapError::InvalidContentCode(value.to_owned()))?;
        Ok(Self(bytes))
    }
}

impl FromStr for ContentCode {
    type Err = DmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl fmt::Display for ContentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentCode({self})")
    }
}
