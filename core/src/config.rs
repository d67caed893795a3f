//! Client configuration.
//!
//! The core never reads the environment or files; callers build a
//! `ClientConfig` directly or deserialize one from whatever source they use.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::types::{Credentials, ENGLISH_LANGUAGE_ID, SMART_HYPERVISOR_TYPE};

/// Everything a `CloudApi` needs to talk to one datacenter.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// Upper bound on one whole request, in seconds. `None` keeps the HTTP
    /// stack's defaults.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_hypervisor_type")]
    pub hypervisor_type: i32,
    #[serde(default = "default_language_id")]
    pub language_id: i32,
}

fn default_hypervisor_type() -> i32 {
    SMART_HYPERVISOR_TYPE
}

fn default_language_id() -> i32 {
    ENGLISH_LANGUAGE_ID
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("hypervisor_type", &self.hypervisor_type)
            .field("language_id", &self.language_id)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(endpoint: &str, username: &str, password: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            timeout_secs: None,
            hypervisor_type: SMART_HYPERVISOR_TYPE,
            language_id: ENGLISH_LANGUAGE_ID,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    pub fn with_hypervisor_type(mut self, hypervisor_type: i32) -> Self {
        self.hypervisor_type = hypervisor_type;
        self
    }

    pub fn with_language_id(mut self, language_id: i32) -> Self {
        self.language_id = language_id;
        self
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
