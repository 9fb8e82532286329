//! The HTTP seam.
//!
//! The client only ever issues GET requests and wants the raw body back.
//! How that happens (blocking HTTP client, test double, recorded
//! fixtures) is up to the [`Transport`] implementation.

use std::time::Duration;

use crate::RequestError;

/// One GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl Request {
    /// First header called `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Performs requests for a [`DaapClient`](crate::DaapClient).
///
/// Implementations block until the body is complete or the request has
/// failed, and map non-2xx answers to
/// [`RequestErrorKind::Status`](crate::RequestErrorKind::Status).
pub trait Transport {
    fn get(&mut self, request: &Request) -> Result<Vec<u8>, RequestError>;
}

impl<F> Transport for F
where
    F: FnMut(&Request) -> Result<Vec<u8>, RequestError>,
{
    fn get(&mut self, request: &Request) -> Result<Vec<u8>, RequestError> {
        self(request)
    }
}
