//! Delete Internet Gateway Use Case
//!
//! Removes a detached internet gateway from the store.

use std::sync::Arc;

use crate::application::locks::{LockKey, ResourceLocks};
use crate::domain::gateways::ItemRepository;
use crate::domain::models::{ItemKey, RequestContext, ResourceKind};
use crate::shared::errors::UseCaseError;

use super::{load_internet_gateway, not_found};

/// Use case for deleting an internet gateway
pub struct DeleteInternetGatewayUseCase {
    item_repository: Arc<dyn ItemRepository>,
    locks: Arc<ResourceLocks>,
}

impl DeleteInternetGatewayUseCase {
    /// Create a new DeleteInternetGatewayUseCase
    #[must_use]
    pub fn new(item_repository: Arc<dyn ItemRepository>, locks: Arc<ResourceLocks>) -> Self {
        Self { item_repository, locks }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::NotFound` if the gateway does not exist.
    /// Returns `UseCaseError::DependencyViolation` if the gateway is still attached.
    /// Returns `UseCaseError::Repository` if the store fails.
    pub async fn execute(&self, ctx: &RequestContext, gateway_key: ItemKey) -> Result<bool, UseCaseError> {
        let project_id = &ctx.project_id;
        let _lock = self
            .locks
            .acquire(vec![LockKey::new(project_id, ResourceKind::InternetGateway, gateway_key)])
            .await;

        let gateway = load_internet_gateway(self.item_repository.as_ref(), project_id, gateway_key).await?;
        tracing::info!(
            project_id = %project_id,
            internet_gateway_id = %gateway.external_id(),
            "Deleting internet gateway"
        );

        if gateway.is_attached() {
            tracing::warn!(
                internet_gateway_id = %gateway.external_id(),
                "Internet gateway is attached and cannot be deleted"
            );
            return Err(UseCaseError::DependencyViolation(format!(
                "The internetGateway '{}' has dependencies and cannot be deleted.",
                gateway.external_id()
            )));
        }

        if !self.item_repository.delete(project_id, gateway_key).await? {
            return Err(not_found(ResourceKind::InternetGateway, gateway_key));
        }

        tracing::info!(
            project_id = %project_id,
            internet_gateway_id = %gateway.external_id(),
            "Internet gateway deleted"
        );
        Ok(true)
    }
}
