//! Network execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is the seam between the client and the network: it performs
//! exactly one exchange and reports the status as data. Interpreting the
//! status is left to `Client`, so a fake transport in tests sees the same
//! contract as the real one.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Largest response body `UreqTransport` reads. ureq's own default is 10 MB,
/// which a large account's server list or template catalog can exceed.
pub const MAX_BODY_BYTES: u64 = 128 * 1024 * 1024;

/// Executes one HTTP `POST` and returns the response, whatever its status.
///
/// Implementations must not retry. Failures that produce no response map to
/// `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// The agent is cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    /// Agent with ureq's default timeouts.
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// Agent whose whole exchange (connect, send, receive) is bounded by `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.agent.post(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(ApiError::transport)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(ApiError::transport)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;

    /// Answer one request on a local socket with `body` and return its URL.
    fn serve_once(body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // Read headers, then the declared request body.
            let header_end = loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
            let content_length: usize = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .map(|v| v.trim().parse().unwrap())
                .unwrap_or(0);
            while request.len() < header_end + content_length {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body.as_bytes()).unwrap();
        });
        format!("http://{addr}/GetServers")
    }

    #[test]
    fn reads_body_larger_than_ureq_default_limit() {
        // 12 MB of JSON, above ureq's 10 MB default.
        let name = "x".repeat(1024);
        let entry = format!(r#"{{"ServerId":1,"Name":"{name}"}}"#);
        let body = format!("[{}]", vec![entry; 12 * 1024].join(","));
        let expected_len = body.len();
        let url = serve_once(body);

        let response = UreqTransport::new()
            .execute(HttpRequest {
                url,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: "{}".to_string(),
            })
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body.len(), expected_len);
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        // Bind then drop so the port is known to be closed.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let transport = UreqTransport::with_timeout(Some(Duration::from_secs(2)));
        let request = HttpRequest {
            url: format!("http://{addr}/GetServers"),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: "{}".to_string(),
        };
        let err = transport.execute(request).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
