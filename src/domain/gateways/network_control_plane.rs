//! Network Control Plane Gateway
//!
//! Contract of the underlying provider that owns routers and external
//! networks.

use async_trait::async_trait;

use crate::shared::errors::ControlPlaneError;

/// Network as reported by the control plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderNetwork {
    pub id: String,
    pub name: String,
}

/// Criteria for listing control plane networks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkFilter {
    pub external: Option<bool>,
    pub name: Option<String>,
}

impl NetworkFilter {
    /// Filter matching the external network with the given name
    #[must_use]
    pub fn external_named(name: impl Into<String>) -> Self {
        Self {
            external: Some(true),
            name: Some(name.into()),
        }
    }
}

/// External gateway settings applied to a router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayInfo {
    pub network_id: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkControlPlane: Send + Sync {
    /// List networks matching the filter
    async fn list_networks(&self, filter: &NetworkFilter) -> Result<Vec<ProviderNetwork>, ControlPlaneError>;

    /// Set the external gateway of a router
    async fn add_gateway_router(&self, router_id: &str, gateway: &GatewayInfo) -> Result<(), ControlPlaneError>;

    /// Clear the external gateway of a router.
    /// Fails with `ControlPlaneError::NotFound` when the router is gone.
    async fn remove_gateway_router(&self, router_id: &str) -> Result<(), ControlPlaneError>;
}
