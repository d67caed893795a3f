//! Synchronous client for the cloud server provisioning API.
//!
//! # Overview
//! Every operation is one JSON `POST` whose body carries the account
//! credentials next to the operation parameters. `CloudApi` exposes one method
//! per remote action; name lookups fetch the collection and return the first
//! match.
//!
//! # Design
//! - `Client` builds `HttpRequest` values and parses `HttpResponse` values;
//!   a `Transport` performs the single network exchange in between.
//! - `UreqTransport` is the default blocking transport. Tests substitute a
//!   recording transport or run against the `mock-server` crate.
//! - No retries, no caching: each call re-fetches fresh state and returns the
//!   transport's error unchanged.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::{find_package, find_template, CloudApi};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ApiError, ResourceKind};
pub use http::{HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    CloudPackage, Credentials, Description, Enqueued, HypervisorType, ResponseEnvelope, Server,
    Template, ENGLISH_LANGUAGE_ID, SMART_HYPERVISOR_TYPE,
};
