use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const USERNAME: &str = "ARU-0000";
pub const PASSWORD: &str = "secret";

pub const SMART_HYPERVISOR: i32 = 4;
pub const HYPERV_HYPERVISOR: i32 = 3;

pub const STATUS_CREATING: i64 = 1;
pub const STATUS_STOPPED: i64 = 2;
pub const STATUS_RUNNING: i64 = 3;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Server {
    pub server_id: i64,
    pub name: String,
    pub server_status: i64,
    pub hypervisor_type: i32,
    #[serde(rename = "OSTemplateId")]
    pub os_template_id: i64,
    #[serde(rename = "SmartVMWarePackageID")]
    pub package_id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HypervisorType {
    pub hypervisor_type: i32,
    pub templates: Vec<Template>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CloudPackage {
    #[serde(rename = "PackageID")]
    pub package_id: i64,
    pub descriptions: Vec<Description>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "LanguageID")]
    pub language_id: i32,
    #[serde(rename = "Text")]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    pub success: bool,
    pub value: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackagesRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub hypervisor_type: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerIdRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub server_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateServerRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub server: NewServer,
}

#[derive(Deserialize)]
pub struct NewServer {
    #[serde(rename = "AdministratorPassword")]
    pub administrator_password: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "SmartVMWarePackageID")]
    pub package_id: i64,
    #[serde(rename = "OSTemplateId")]
    pub os_template_id: i64,
    #[serde(rename = "Note", default)]
    pub note: String,
}

#[derive(Default)]
pub struct Inventory {
    servers: HashMap<i64, Server>,
    next_id: i64,
}

pub type Db = Arc<RwLock<Inventory>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Inventory::default()));
    Router::new()
        .route("/GetHypervisors", post(get_hypervisors))
        .route("/GetPreconfiguredPackages", post(get_packages))
        .route("/GetServers", post(get_servers))
        .route("/GetServerDetails", post(get_server_details))
        .route("/SetEnqueueServerCreation", post(enqueue_creation))
        .route("/SetEnqueueServerDeletion", post(enqueue_deletion))
        .route("/SetEnqueueServerStart", post(enqueue_start))
        .route("/SetEnqueueServerStop", post(enqueue_stop))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Hypervisor catalog. Both types offer a template named `ubuntu2204_x64_1_0`.
pub fn hypervisors() -> Vec<HypervisorType> {
    let template = |id: i64, name: &str, description: &str| Template {
        id,
        name: name.to_string(),
        description: description.to_string(),
    };
    vec![
        HypervisorType {
            hypervisor_type: HYPERV_HYPERVISOR,
            templates: vec![template(301, "ubuntu2204_x64_1_0", "Ubuntu 22.04 (Hyper-V)")],
        },
        HypervisorType {
            hypervisor_type: SMART_HYPERVISOR,
            templates: vec![
                template(401, "ubuntu2204_x64_1_0", "Ubuntu 22.04 64bit"),
                template(402, "WS22-001_W2K22_1_0", "Windows Server 2022"),
            ],
        },
    ]
}

pub fn packages() -> Vec<CloudPackage> {
    let package = |package_id: i64, italian: &str, english: &str| CloudPackage {
        package_id,
        descriptions: vec![
            Description {
                language_id: 1,
                text: italian.to_string(),
            },
            Description {
                language_id: 2,
                text: english.to_string(),
            },
        ],
    };
    vec![
        package(1, "Piccolo", "Small"),
        package(2, "Medio", "Medium"),
        package(3, "Grande", "Large"),
    ]
}

fn authorize(credentials: &Credentials) -> Result<(), StatusCode> {
    if credentials.username == USERNAME && credentials.password == PASSWORD {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn accepted(value: Value) -> Json<Envelope> {
    Json(Envelope {
        success: true,
        value,
    })
}

async fn get_hypervisors(
    Json(credentials): Json<Credentials>,
) -> Result<Json<Vec<HypervisorType>>, StatusCode> {
    authorize(&credentials)?;
    Ok(Json(hypervisors()))
}

async fn get_packages(
    Json(input): Json<PackagesRequest>,
) -> Result<Json<Vec<CloudPackage>>, StatusCode> {
    authorize(&input.credentials)?;
    if input.hypervisor_type != SMART_HYPERVISOR {
        return Ok(Json(Vec::new()));
    }
    Ok(Json(packages()))
}

async fn get_servers(
    State(db): State<Db>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Vec<Server>>, StatusCode> {
    authorize(&credentials)?;
    let inventory = db.read().await;
    let mut servers: Vec<Server> = inventory.servers.values().cloned().collect();
    servers.sort_by_key(|s| s.server_id);
    Ok(Json(servers))
}

async fn get_server_details(
    State(db): State<Db>,
    Json(input): Json<ServerIdRequest>,
) -> Result<Json<Server>, StatusCode> {
    authorize(&input.credentials)?;
    let inventory = db.read().await;
    inventory
        .servers
        .get(&input.server_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn enqueue_creation(
    State(db): State<Db>,
    Json(input): Json<CreateServerRequest>,
) -> Result<Json<Server>, StatusCode> {
    authorize(&input.credentials)?;
    let request = input.server;

    let template_known = hypervisors()
        .iter()
        .filter(|hv| hv.hypervisor_type == SMART_HYPERVISOR)
        .flat_map(|hv| hv.templates.iter())
        .any(|t| t.id == request.os_template_id);
    let package_known = packages().iter().any(|p| p.package_id == request.package_id);
    if !template_known || !package_known || request.administrator_password.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut inventory = db.write().await;
    inventory.next_id += 1;
    let server = Server {
        server_id: inventory.next_id,
        name: request.name,
        server_status: STATUS_CREATING,
        hypervisor_type: SMART_HYPERVISOR,
        os_template_id: request.os_template_id,
        package_id: request.package_id,
    };
    debug!(server_id = server.server_id, note = %request.note, "server creation enqueued");
    inventory.servers.insert(server.server_id, server.clone());
    Ok(Json(server))
}

async fn enqueue_deletion(
    State(db): State<Db>,
    Json(input): Json<ServerIdRequest>,
) -> Result<Json<Envelope>, StatusCode> {
    authorize(&input.credentials)?;
    let mut inventory = db.write().await;
    inventory
        .servers
        .remove(&input.server_id)
        .map(|s| accepted(Value::from(s.server_id)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn enqueue_start(
    State(db): State<Db>,
    Json(input): Json<ServerIdRequest>,
) -> Result<Json<Envelope>, StatusCode> {
    set_status(db, input, STATUS_RUNNING).await
}

async fn enqueue_stop(
    State(db): State<Db>,
    Json(input): Json<ServerIdRequest>,
) -> Result<Json<Envelope>, StatusCode> {
    set_status(db, input, STATUS_STOPPED).await
}

async fn set_status(
    db: Db,
    input: ServerIdRequest,
    status: i64,
) -> Result<Json<Envelope>, StatusCode> {
    authorize(&input.credentials)?;
    let mut inventory = db.write().await;
    let server = inventory
        .servers
        .get_mut(&input.server_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    server.server_status = status;
    Ok(accepted(Value::from(server.server_id)))
}
