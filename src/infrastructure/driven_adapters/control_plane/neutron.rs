//! Neutron Control Plane Client
//!
//! Implements the NetworkControlPlane trait against a Neutron v2.0 style
//! networking API using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use zeroize::Zeroizing;

use crate::domain::gateways::{GatewayInfo, NetworkControlPlane, NetworkFilter, ProviderNetwork};
use crate::infrastructure::driven_adapters::config::ControlPlaneConfig;
use crate::shared::errors::ControlPlaneError;

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

#[derive(Debug, Deserialize)]
struct NetworksResponse {
    networks: Vec<NetworkBody>,
}

#[derive(Debug, Deserialize)]
struct NetworkBody {
    id: String,
    #[serde(default)]
    name: String,
}

/// HTTP client for the Neutron networking API
pub struct NeutronClient {
    http: Client,
    base_url: String,
    auth_token: Option<Zeroizing<String>>,
}

impl NeutronClient {
    /// Create a new NeutronClient from configuration
    ///
    /// # Errors
    ///
    /// Returns `ControlPlaneError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ControlPlaneConfig) -> Result<Self, ControlPlaneError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let auth_token = Some(config.auth_token.as_str())
            .filter(|token| !token.is_empty())
            .map(|token| Zeroizing::new(token.to_string()));

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2.0/{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header(AUTH_TOKEN_HEADER, token.as_str()),
            None => request,
        }
    }

    async fn check(response: Response, resource: &str) -> Result<Response, ControlPlaneError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ControlPlaneError::NotFound(resource.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ControlPlaneError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Ok(response)
    }

    async fn update_router(&self, router_id: &str, gateway: serde_json::Value) -> Result<(), ControlPlaneError> {
        let url = self.url(&format!("routers/{router_id}"));
        tracing::debug!(router_id, "PUT {url}");

        let response = self
            .authorized(self.http.put(&url))
            .json(&json!({ "router": { "external_gateway_info": gateway } }))
            .send()
            .await?;
        Self::check(response, &format!("router {router_id}")).await?;
        Ok(())
    }
}

#[async_trait]
impl NetworkControlPlane for NeutronClient {
    async fn list_networks(&self, filter: &NetworkFilter) -> Result<Vec<ProviderNetwork>, ControlPlaneError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(external) = filter.external {
            query.push(("router:external", if external { "True" } else { "False" }.to_string()));
        }
        if let Some(name) = &filter.name {
            query.push(("name", name.clone()));
        }

        let url = self.url("networks");
        tracing::debug!(?filter, "GET {url}");

        let response = self.authorized(self.http.get(&url)).query(&query).send().await?;
        let response = Self::check(response, "networks").await?;
        let body: NetworksResponse = response
            .json()
            .await
            .map_err(|e| ControlPlaneError::Mapping(format!("Failed to parse networks: {e}")))?;

        Ok(body
            .networks
            .into_iter()
            .map(|network| ProviderNetwork {
                id: network.id,
                name: network.name,
            })
            .collect())
    }

    async fn add_gateway_router(&self, router_id: &str, gateway: &GatewayInfo) -> Result<(), ControlPlaneError> {
        self.update_router(router_id, json!({ "network_id": gateway.network_id })).await
    }

    async fn remove_gateway_router(&self, router_id: &str) -> Result<(), ControlPlaneError> {
        self.update_router(router_id, json!({})).await
    }
}
