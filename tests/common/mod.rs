//! Common test utilities for e2e tests
//!
//! Builds the full router over an in-memory item store and a wiremock server
//! standing in for the Neutron control plane.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ec2_network_gateway::application::locks::ResourceLocks;
use ec2_network_gateway::application::use_cases::internet_gateways::{
    AttachInternetGatewayUseCase, CreateInternetGatewayUseCase, DeleteInternetGatewayUseCase,
    DescribeInternetGatewaysUseCase, DetachInternetGatewayUseCase,
};
use ec2_network_gateway::domain::gateways::{ItemRepository, NetworkControlPlane};
use ec2_network_gateway::domain::models::{ExternalId, ItemAttributes, ProjectId, ResourceKind};
use ec2_network_gateway::infrastructure::driven_adapters::config::AppConfig;
use ec2_network_gateway::infrastructure::driven_adapters::{MemoryItemRepository, NeutronClient};
use ec2_network_gateway::infrastructure::driving_adapters::api_rest::{self, AppState};

/// Test JWT secret (minimum 32 characters)
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-key-for-e2e-testing-only-min-32-chars";

pub const TEST_PROJECT: &str = "project-a";
pub const OTHER_PROJECT: &str = "project-b";
pub const EXTERNAL_NETWORK_ID: &str = "net-public";

/// JWT claims for test tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct TestClaims {
    pub sub: String,
    pub project_id: String,
    pub iat: i64,
    pub exp: i64,
}

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub repository: Arc<MemoryItemRepository>,
    pub neutron: MockServer,
    pub jwt_token: String,
}

impl TestApp {
    /// Create a new test application with an empty store and a fresh control plane mock
    pub async fn new() -> Self {
        let neutron = MockServer::start().await;
        let config = Arc::new(create_test_config(&neutron.uri()));

        let repository = Arc::new(MemoryItemRepository::new());
        let item_repository: Arc<dyn ItemRepository> = repository.clone();
        let control_plane: Arc<dyn NetworkControlPlane> =
            Arc::new(NeutronClient::new(&config.control_plane).expect("Failed to build control plane client"));
        let locks = Arc::new(ResourceLocks::new());

        let app_state = AppState {
            config: config.clone(),
            create_internet_gateway_use_case: Arc::new(CreateInternetGatewayUseCase::new(item_repository.clone())),
            attach_internet_gateway_use_case: Arc::new(AttachInternetGatewayUseCase::new(
                item_repository.clone(),
                control_plane.clone(),
                locks.clone(),
                config.control_plane.external_network.clone(),
            )),
            detach_internet_gateway_use_case: Arc::new(DetachInternetGatewayUseCase::new(
                item_repository.clone(),
                control_plane,
                locks.clone(),
            )),
            delete_internet_gateway_use_case: Arc::new(DeleteInternetGatewayUseCase::new(
                item_repository.clone(),
                locks,
            )),
            describe_internet_gateways_use_case: Arc::new(DescribeInternetGatewaysUseCase::new(item_repository)),
        };

        // Without rate limiting for tests
        let router = api_rest::router(app_state);

        Self {
            router,
            repository,
            neutron,
            jwt_token: generate_test_token(TEST_PROJECT),
        }
    }

    /// Get the authorization header value for requests
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Send a request authenticated as the test project
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        self.send_as(&self.auth_header(), method, uri, body).await
    }

    /// Send a request with an explicit Authorization header value
    pub async fn send_as(&self, authorization: &str, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let body = body.map_or_else(Body::empty, |value| Body::from(value.to_string()));
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::AUTHORIZATION, authorization)
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Create a gateway through the API and return its id
    pub async fn create_gateway(&self) -> String {
        let response = self.send(Method::POST, "/internet-gateways", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let gateway: InternetGatewayResponse = read_json(response).await;
        gateway.internet_gateway_id
    }

    /// Store a VPC backed by the given router and return its external id
    pub async fn seed_vpc(&self, router_id: &str) -> String {
        self.seed_vpc_in(TEST_PROJECT, router_id).await
    }

    pub async fn seed_vpc_in(&self, project: &str, router_id: &str) -> String {
        let item = self
            .repository
            .add(
                &ProjectId::new(project),
                ItemAttributes::Vpc {
                    os_id: router_id.to_string(),
                },
            )
            .await
            .expect("Failed to seed vpc");
        ExternalId::encode(ResourceKind::Vpc, item.key()).to_string()
    }

    /// Attach through the API, returning the response
    pub async fn attach(&self, gateway_id: &str, vpc_id: &str) -> Response<Body> {
        self.send(
            Method::PUT,
            &format!("/internet-gateways/{gateway_id}/attachment"),
            Some(json!({ "vpcId": vpc_id })),
        )
        .await
    }

    /// Detach through the API, returning the response
    pub async fn detach(&self, gateway_id: &str, vpc_id: &str) -> Response<Body> {
        self.send(
            Method::DELETE,
            &format!("/internet-gateways/{gateway_id}/attachment/{vpc_id}"),
            None,
        )
        .await
    }

    /// Describe a single gateway
    pub async fn describe(&self, gateway_id: &str) -> InternetGatewayResponse {
        let response = self.send(Method::GET, &format!("/internet-gateways/{gateway_id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await
    }

    /// Serve the configured external network on the control plane mock
    pub async fn mock_external_network(&self) {
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .and(query_param("router:external", "True"))
            .and(query_param("name", "public"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "networks": [{ "id": EXTERNAL_NETWORK_ID, "name": "public", "router:external": true }]
            })))
            .mount(&self.neutron)
            .await;
    }

    /// Report no network matching the external network name
    pub async fn mock_no_external_network(&self) {
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "networks": [] })))
            .mount(&self.neutron)
            .await;
    }

    /// Answer router gateway updates with the given status
    pub async fn mock_set_gateway(&self, router_id: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/v2.0/routers/{router_id}")))
            .and(body_json(json!({
                "router": { "external_gateway_info": { "network_id": EXTERNAL_NETWORK_ID } }
            })))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "router": { "id": router_id } })))
            .mount(&self.neutron)
            .await;
    }

    /// Answer router gateway removals with the given status
    pub async fn mock_clear_gateway(&self, router_id: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/v2.0/routers/{router_id}")))
            .and(body_json(json!({ "router": { "external_gateway_info": {} } })))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "router": { "id": router_id } })))
            .mount(&self.neutron)
            .await;
    }
}

/// Create a test configuration pointing at the control plane mock
fn create_test_config(control_plane_url: &str) -> AppConfig {
    use config::{Config, File, FileFormat};

    let config_str = format!(
        r#"
[server]
host = "127.0.0.1"
port = 0

[database]
backend = "memory"
max_connections = 5
min_connections = 1

[jwt]
secret = "{TEST_JWT_SECRET}"
expires_in_secs = 3600

[rate_limit]
requests_per_second = 1000
burst_size = 1000

[control_plane]
url = "{control_plane_url}"
auth_token = "test-service-token"
timeout_secs = 5
external_network = "public"
"#
    );

    Config::builder()
        .add_source(File::from_str(&config_str, FileFormat::Toml))
        .build()
        .expect("Failed to build test config")
        .try_deserialize()
        .expect("Failed to deserialize test config")
}

fn sign(claims: &TestClaims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to generate test JWT token")
}

/// Generate a valid JWT token for the given project
pub fn generate_test_token(project_id: &str) -> String {
    let now = Utc::now().timestamp();
    sign(&TestClaims {
        sub: "test-user-id".to_string(),
        project_id: project_id.to_string(),
        iat: now,
        exp: now + 3600,
    })
}

/// Generate an expired JWT token for testing unauthorized scenarios
pub fn generate_expired_token() -> String {
    let now = Utc::now().timestamp();
    sign(&TestClaims {
        sub: "test-user-id".to_string(),
        project_id: TEST_PROJECT.to_string(),
        iat: now - 7200,
        exp: now - 3600,
    })
}

/// Deserialize a JSON response body
pub async fn read_json<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Gateway response structure for deserialization
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InternetGatewayResponse {
    pub internet_gateway_id: String,
    pub attachment_set: Vec<AttachmentResponse>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponse {
    pub vpc_id: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeResponse {
    pub internet_gateway_set: Vec<InternetGatewayResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnResponse {
    #[serde(rename = "return")]
    pub value: bool,
}

/// Error response structure for deserialization
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub request_id: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<Vec<FieldError>>,
}

#[derive(Debug, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
