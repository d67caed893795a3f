//! One method per remote action of the provisioning API.
//!
//! # Design
//! `CloudApi` wraps a `Client` and holds only immutable configuration, so it
//! is safe to share between threads whenever its transport is. Every method
//! is a single `POST`; the two name lookups re-fetch the collection and scan
//! it with `find_template` / `find_package`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{ApiError, ResourceKind};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    CloudPackage, CreateServerParams, Credentials, Enqueued, HypervisorType, NewServer, NoParams,
    PackagesParams, Server, ServerIdParams, Template,
};

pub const GET_HYPERVISORS: &str = "/GetHypervisors";
pub const GET_PRECONFIGURED_PACKAGES: &str = "/GetPreconfiguredPackages";
pub const GET_SERVERS: &str = "/GetServers";
pub const GET_SERVER_DETAILS: &str = "/GetServerDetails";
pub const ENQUEUE_SERVER_CREATION: &str = "/SetEnqueueServerCreation";
pub const ENQUEUE_SERVER_DELETION: &str = "/SetEnqueueServerDeletion";
pub const ENQUEUE_SERVER_START: &str = "/SetEnqueueServerStart";
pub const ENQUEUE_SERVER_STOP: &str = "/SetEnqueueServerStop";

/// Synchronous facade over the provisioning API.
#[derive(Debug, Clone)]
pub struct CloudApi<T = UreqTransport> {
    client: Client<T>,
    hypervisor_type: i32,
    language_id: i32,
}

impl CloudApi<UreqTransport> {
    /// API for `endpoint` with default hypervisor type, language and timeouts.
    pub fn new(endpoint: &str, username: &str, password: &str) -> Self {
        Self::from_config(&ClientConfig::new(endpoint, username, password))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::with_timeout(config.timeout()))
    }
}

impl<T: Transport> CloudApi<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            client: Client::new(&config.endpoint, config.credentials(), transport),
            hypervisor_type: config.hypervisor_type,
            language_id: config.language_id,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    /// Every hypervisor type with its templates, unfiltered.
    pub fn get_templates(&self) -> Result<Vec<HypervisorType>, ApiError> {
        self.post_list(GET_HYPERVISORS, &NoParams {})
    }

    /// Packages offered for the configured hypervisor type.
    pub fn get_preconfigured_packages(&self) -> Result<Vec<CloudPackage>, ApiError> {
        let params = PackagesParams {
            hypervisor_type: self.hypervisor_type,
        };
        self.post_list(GET_PRECONFIGURED_PACKAGES, &params)
    }

    /// The package whose description in the configured language is exactly `name`.
    pub fn get_preconfigured_package(&self, name: &str) -> Result<CloudPackage, ApiError> {
        let packages = self.get_preconfigured_packages()?;
        find_package(&packages, self.language_id, name)
            .cloned()
            .ok_or_else(|| self.not_found(ResourceKind::Package, name))
    }

    /// The template named `name` under the configured hypervisor type.
    pub fn get_template(&self, name: &str) -> Result<Template, ApiError> {
        let hypervisors = self.get_templates()?;
        find_template(&hypervisors, self.hypervisor_type, name)
            .cloned()
            .ok_or_else(|| self.not_found(ResourceKind::Template, name))
    }

    pub fn get_servers(&self) -> Result<Vec<Server>, ApiError> {
        self.post_list(GET_SERVERS, &NoParams {})
    }

    pub fn get_server(&self, server_id: i64) -> Result<Server, ApiError> {
        self.client.post(GET_SERVER_DETAILS, &ServerIdParams { server_id })
    }

    /// Enqueue creation of a server.
    ///
    /// The service provisions asynchronously: the returned `Server` describes
    /// the queued job, not a running machine. Poll `get_server` for progress.
    pub fn create_server(
        &self,
        name: &str,
        admin_password: &str,
        package_id: i64,
        os_template_id: i64,
    ) -> Result<Server, ApiError> {
        let params = CreateServerParams {
            server: NewServer {
                administrator_password: admin_password.to_string(),
                name: name.to_string(),
                smart_vmware_package_id: package_id,
                note: String::new(),
                os_template_id,
            },
        };
        debug!(name, package_id, os_template_id, "posting create server request");
        self.client.post(ENQUEUE_SERVER_CREATION, &params)
    }

    pub fn delete_server(&self, server_id: i64) -> Result<Enqueued, ApiError> {
        self.client
            .post_ack(ENQUEUE_SERVER_DELETION, &ServerIdParams { server_id })
    }

    pub fn start_server(&self, server_id: i64) -> Result<Enqueued, ApiError> {
        self.client
            .post_ack(ENQUEUE_SERVER_START, &ServerIdParams { server_id })
    }

    pub fn stop_server(&self, server_id: i64) -> Result<Enqueued, ApiError> {
        self.client
            .post_ack(ENQUEUE_SERVER_STOP, &ServerIdParams { server_id })
    }

    /// Credentials sent with every request.
    pub fn credentials(&self) -> &Credentials {
        self.client.credentials()
    }

    /// Collections may come back as `null`, which means empty.
    fn post_list<P, R>(&self, subpath: &str, params: &P) -> Result<Vec<R>, ApiError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.client
            .post::<P, Option<Vec<R>>>(subpath, params)
            .map(Option::unwrap_or_default)
    }

    fn not_found(&self, kind: ResourceKind, name: &str) -> ApiError {
        ApiError::NotFound {
            kind,
            name: name.to_string(),
            endpoint: self.client.endpoint().to_string(),
        }
    }
}

/// First template named `name` among the hypervisor types equal to `hypervisor_type`.
pub fn find_template<'a>(
    hypervisors: &'a [HypervisorType],
    hypervisor_type: i32,
    name: &str,
) -> Option<&'a Template> {
    hypervisors
        .iter()
        .filter(|hv| hv.hypervisor_type == hypervisor_type)
        .flat_map(|hv| hv.templates.iter())
        .find(|t| t.name == name)
}

/// First package with a `language_id` description whose text is exactly `name`.
pub fn find_package<'a>(
    packages: &'a [CloudPackage],
    language_id: i32,
    name: &str,
) -> Option<&'a CloudPackage> {
    packages.iter().find(|p| {
        p.descriptions
            .iter()
            .any(|d| d.language_id == language_id && d.text == name)
    })
}
