//! Authenticated JSON-over-POST client.
//!
//! # Design
//! `Client` holds the endpoint, the credentials and a `Transport`, and carries
//! no mutable state between calls. Each exchange is split into
//! `build_request` (produces an `HttpRequest`), one `Transport::execute`, and
//! a `parse_*` step that consumes the `HttpResponse`. The build and parse
//! halves are public and deterministic so they can be tested without a
//! network.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Authenticated, Credentials, Enqueued, ResponseEnvelope};

/// Sends credential-bearing JSON requests to one API endpoint.
#[derive(Debug, Clone)]
pub struct Client<T> {
    endpoint: String,
    credentials: Credentials,
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(endpoint: &str, credentials: Credentials, transport: T) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the `POST <endpoint><subpath>` request carrying `params` and the credentials.
    pub fn build_request<P: Serialize>(
        &self,
        subpath: &str,
        params: &P,
    ) -> Result<HttpRequest, ApiError> {
        let body = Authenticated {
            credentials: &self.credentials,
            params,
        };
        let body =
            serde_json::to_string(&body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            url: format!("{}{}", self.endpoint, subpath),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ],
            body,
        })
    }

    /// Decode a 2xx body into `R`.
    pub fn parse_json<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Accept any 2xx response; the body is kept when it is a `{Success, Value}` envelope.
    pub fn parse_ack(&self, response: HttpResponse) -> Result<Enqueued, ApiError> {
        check_status(&response)?;
        let envelope = serde_json::from_str::<ResponseEnvelope>(&response.body).ok();
        Ok(Enqueued { envelope })
    }

    /// POST `params` to `subpath` and decode the response into `R`.
    pub fn post<P, R>(&self, subpath: &str, params: &P) -> Result<R, ApiError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let response = self.send(subpath, params)?;
        self.parse_json(response)
    }

    /// POST `params` to `subpath` when the caller only needs success or failure.
    pub fn post_ack<P: Serialize>(&self, subpath: &str, params: &P) -> Result<Enqueued, ApiError> {
        let response = self.send(subpath, params)?;
        self.parse_ack(response)
    }

    fn send<P: Serialize>(&self, subpath: &str, params: &P) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(subpath, params)?;
        trace!(subpath, "sending request");
        self.transport.execute(request)
    }
}

/// Map non-2xx status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
