//! Domain DTOs for the provisioning API.
//!
//! # Design
//! Field names follow the service's PascalCase wire format. The records are
//! pass-through: fields the client does not interpret are kept in `extra` so a
//! decoded value re-serializes with everything the service sent.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Hypervisor type this client provisions against by default (VMware Smart).
pub const SMART_HYPERVISOR_TYPE: i32 = 4;

/// Language id of the package descriptions matched by default (English).
pub const ENGLISH_LANGUAGE_ID: i32 = 2;

/// Account credentials sent in the body of every request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A virtual server as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Server {
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor_type: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A hypervisor type together with the OS templates offered under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HypervisorType {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hypervisor_type: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub templates: Vec<Template>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An OS image usable for server creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A preconfigured CPU/RAM/disk tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CloudPackage {
    #[serde(rename = "PackageID", default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub descriptions: Vec<Description>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A localized package label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "LanguageID", default, deserialize_with = "null_as_default")]
    pub language_id: i32,
    #[serde(rename = "Text", default, deserialize_with = "null_as_default")]
    pub text: String,
}

/// `{Success, Value}` body returned by the enqueue endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub value: Option<Value>,
}

/// Outcome of a fire-and-forget action the service accepted at the HTTP level.
///
/// The service processes the action asynchronously. `envelope` holds the
/// decoded body when it had the `{Success, Value}` shape; it is not checked.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Enqueued {
    pub envelope: Option<ResponseEnvelope>,
}

impl Enqueued {
    /// The service's own `Success` flag, when it reported one.
    pub fn reported_success(&self) -> Option<bool> {
        self.envelope.as_ref().and_then(|e| e.success)
    }
}

/// Request body: credentials plus operation parameters flattened into one JSON object.
#[derive(Debug, Serialize)]
pub struct Authenticated<'a, P> {
    #[serde(flatten)]
    pub credentials: &'a Credentials,
    #[serde(flatten)]
    pub params: &'a P,
}

/// Parameters of the listing endpoints, which take none.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoParams {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackagesParams {
    pub hypervisor_type: i32,
}

/// Parameters of every server-scoped endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerIdParams {
    pub server_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateServerParams {
    pub server: NewServer,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewServer {
    #[serde(rename = "AdministratorPassword")]
    pub administrator_password: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "SmartVMWarePackageID")]
    pub smart_vmware_package_id: i64,
    #[serde(rename = "Note")]
    pub note: String,
    #[serde(rename = "OSTemplateId")]
    pub os_template_id: i64,
}

/// Decode `null` the same way as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_keeps_unknown_fields() {
        let raw = json!({
            "ServerId": 42,
            "Name": "web",
            "ServerStatus": 3,
            "CPUQuantity": 2,
            "NetworkAdapters": [{"Id": 1}]
        });
        let server: Server = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(server.server_id, 42);
        assert_eq!(server.name, "web");
        assert_eq!(server.server_status, Some(3));
        assert_eq!(server.extra["CPUQuantity"], 2);
        assert_eq!(serde_json::to_value(&server).unwrap(), raw);
    }

    #[test]
    fn server_tolerates_sparse_body() {
        let server: Server = serde_json::from_str("{}").unwrap();
        assert_eq!(server.server_id, 0);
        assert!(server.name.is_empty());
        assert!(server.server_status.is_none());
    }

    #[test]
    fn package_decodes_descriptions() {
        let package: CloudPackage = serde_json::from_value(json!({
            "PackageID": 7,
            "Descriptions": [
                {"LanguageID": 1, "Text": "Piccolo"},
                {"LanguageID": 2, "Text": "Small"}
            ]
        }))
        .unwrap();
        assert_eq!(package.package_id, Some(7));
        assert_eq!(package.descriptions[1].language_id, ENGLISH_LANGUAGE_ID);
        assert_eq!(package.descriptions[1].text, "Small");
    }

    #[test]
    fn authenticated_flattens_credentials_and_params() {
        let credentials = Credentials::new("user", "secret");
        let body = Authenticated {
            credentials: &credentials,
            params: &ServerIdParams { server_id: 9 },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"Username": "user", "Password": "secret", "ServerId": 9})
        );
    }

    #[test]
    fn authenticated_without_params_is_credentials_only() {
        let credentials = Credentials::new("user", "secret");
        let body = Authenticated {
            credentials: &credentials,
            params: &NoParams {},
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"Username": "user", "Password": "secret"})
        );
    }

    #[test]
    fn null_members_decode_as_empty() {
        let server: Server =
            serde_json::from_str(r#"{"ServerId":null,"Name":null,"ServerStatus":null}"#).unwrap();
        assert_eq!(server.server_id, 0);
        assert!(server.name.is_empty());
        assert!(server.server_status.is_none());

        let hv: HypervisorType =
            serde_json::from_str(r#"{"HypervisorType":3,"Templates":null}"#).unwrap();
        assert!(hv.templates.is_empty());

        let package: CloudPackage = serde_json::from_str(
            r#"{"PackageID":1,"Descriptions":[{"LanguageID":1,"Text":null}]}"#,
        )
        .unwrap();
        assert_eq!(package.descriptions[0].text, "");

        let package: CloudPackage = serde_json::from_str(r#"{"Descriptions":null}"#).unwrap();
        assert!(package.descriptions.is_empty());
    }

    #[test]
    fn missing_catalog_ids_and_names_default() {
        let hv: HypervisorType = serde_json::from_str(r#"{"Templates":[{"Description":"x"}]}"#).unwrap();
        assert_eq!(hv.hypervisor_type, 0);
        assert_eq!(hv.templates[0].id, 0);
        assert!(hv.templates[0].name.is_empty());
        assert_eq!(hv.templates[0].description.as_deref(), Some("x"));

        let template: Template = serde_json::from_str(r#"{"Id":null,"Name":null}"#).unwrap();
        assert_eq!(template.id, 0);
        assert!(template.name.is_empty());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("user", "hunter2"));
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn envelope_fields_are_optional() {
        let env: ResponseEnvelope = serde_json::from_str(r#"{"Value":"queued"}"#).unwrap();
        assert_eq!(env.success, None);
        assert_eq!(env.value, Some(json!("queued")));
        let ack = Enqueued { envelope: Some(env) };
        assert_eq!(ack.reported_success(), None);
    }
}
