//! HTTP exchange described as plain data.
//!
//! # Design
//! `Client` builds `HttpRequest` values and parses `HttpResponse` values; a
//! `Transport` sits between the two and is the only place that touches the
//! network. Every call this API makes is a JSON `POST`, so the request carries
//! no method field.

/// An outgoing JSON `POST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// A response as returned by the transport, before status interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
