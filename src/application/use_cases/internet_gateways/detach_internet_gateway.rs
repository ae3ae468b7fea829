//! Detach Internet Gateway Use Case
//!
//! Detaches a gateway from the VPC it is attached to and clears the VPC
//! router's external gateway.

use std::sync::Arc;

use crate::application::compensation::Compensation;
use crate::application::locks::{LockKey, ResourceLocks};
use crate::domain::gateways::{ItemRepository, NetworkControlPlane};
use crate::domain::models::{ExternalId, ItemKey, RequestContext, ResourceKind};
use crate::shared::errors::{ControlPlaneError, UseCaseError};

use super::{load_internet_gateway, load_vpc, restore_internet_gateway, save_internet_gateway};

/// Use case for detaching an internet gateway from a VPC
pub struct DetachInternetGatewayUseCase {
    item_repository: Arc<dyn ItemRepository>,
    control_plane: Arc<dyn NetworkControlPlane>,
    locks: Arc<ResourceLocks>,
}

impl DetachInternetGatewayUseCase {
    /// Create a new DetachInternetGatewayUseCase
    #[must_use]
    pub fn new(
        item_repository: Arc<dyn ItemRepository>,
        control_plane: Arc<dyn NetworkControlPlane>,
        locks: Arc<ResourceLocks>,
    ) -> Self {
        Self {
            item_repository,
            control_plane,
            locks,
        }
    }

    /// Execute the use case
    ///
    /// A router the control plane no longer knows counts as detached.
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::NotFound` if the gateway or VPC does not exist.
    /// Returns `UseCaseError::GatewayNotAttached` unless the gateway is attached to exactly this VPC.
    /// Returns `UseCaseError::ControlPlane` if the control plane call fails; the
    /// attachment is restored first.
    pub async fn execute(&self, ctx: &RequestContext, gateway_key: ItemKey, vpc_key: ItemKey) -> Result<bool, UseCaseError> {
        let project_id = &ctx.project_id;
        let gateway_id = ExternalId::encode(ResourceKind::InternetGateway, gateway_key);
        let vpc_id = ExternalId::encode(ResourceKind::Vpc, vpc_key);

        tracing::info!(
            project_id = %project_id,
            internet_gateway_id = %gateway_id,
            vpc_id = %vpc_id,
            "Detaching internet gateway"
        );

        let locks = self
            .locks
            .acquire(vec![
                LockKey::new(project_id, ResourceKind::InternetGateway, gateway_key),
                LockKey::new(project_id, ResourceKind::Vpc, vpc_key),
            ])
            .await;

        let gateway = load_internet_gateway(self.item_repository.as_ref(), project_id, gateway_key).await?;
        let vpc = load_vpc(self.item_repository.as_ref(), project_id, vpc_key).await?;

        if !gateway.is_attached_to(vpc.key()) {
            tracing::warn!(
                internet_gateway_id = %gateway_id,
                vpc_id = %vpc_id,
                "Internet gateway is not attached to this VPC"
            );
            return Err(UseCaseError::GatewayNotAttached {
                gateway_id: gateway_id.to_string(),
                vpc_id: vpc_id.to_string(),
            });
        }

        save_internet_gateway(self.item_repository.as_ref(), project_id, &gateway.detached()).await?;
        let compensation = {
            let repository = self.item_repository.clone();
            let project_id = project_id.clone();
            let previous = gateway.clone();
            // The reversal owns the locks; an abandoned request keeps them until the record is restored
            Compensation::register("reattach internet gateway record", move || async move {
                let _locks = locks;
                restore_internet_gateway(repository.as_ref(), &project_id, &previous).await
            })
        };

        let remove_gateway = async {
            match self.control_plane.remove_gateway_router(vpc.os_id()).await {
                Err(ControlPlaneError::NotFound(detail)) => {
                    tracing::warn!(
                        router_id = vpc.os_id(),
                        detail = %detail,
                        "Router not found on control plane, treating gateway as detached"
                    );
                    Ok(())
                }
                other => other,
            }
        };
        compensation.guard(remove_gateway).await.map_err(|err| {
            tracing::warn!(
                internet_gateway_id = %gateway_id,
                vpc_id = %vpc_id,
                router_id = vpc.os_id(),
                error = %err,
                "Control plane rejected gateway detachment"
            );
            err
        })?;

        tracing::info!(
            project_id = %project_id,
            internet_gateway_id = %gateway_id,
            vpc_id = %vpc_id,
            "Internet gateway detached"
        );
        Ok(true)
    }
}
