//! HttpSender trait - Dispatcher output interface
//!
//! Defines the abstract interface for the HTTP transport.

use crate::{AuthHeaders, TransportError};

/// Content type of every dispatched payload
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP method; readings are only ever pushed with `PUT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Put => "PUT",
        }
    }
}

/// Request handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    /// Path relative to the receiver base URL, starting with `/`
    pub path: String,
    pub headers: Vec<(String, String)>,
    /// Already-serialized JSON body
    pub body: String,
}

impl OutboundRequest {
    /// JSON `PUT` carrying the given auth headers
    pub fn signed_put(path: impl Into<String>, auth: &AuthHeaders, body: String) -> Self {
        let mut request = Self {
            method: HttpMethod::Put,
            path: path.into(),
            headers: Vec::with_capacity(3),
            body,
        };
        for (name, value) in auth.pairs() {
            request = request.header(name, value);
        }
        request.header("Content-Type", JSON_CONTENT_TYPE)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header value with the given name (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response returned by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundResponse {
    pub status: u16,
    pub body: String,
}

impl InboundResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `204 No Content`, the only status the receiver answers on success
    pub fn is_no_content(&self) -> bool {
        self.status == 204
    }
}

/// HTTP transport trait
///
/// Shared across concurrently running ticks, hence `&self`.
#[trait_variant::make(HttpSender: Send)]
pub trait LocalHttpSender {
    /// Transport name (used for logging)
    fn name(&self) -> &str;

    /// Issue one request and wait for its response
    ///
    /// # Errors
    /// Returns `TransportError` when no response was received.
    /// A response with any status code is `Ok`.
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportError>;
}
