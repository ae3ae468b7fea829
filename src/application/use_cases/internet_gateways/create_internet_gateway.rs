//! Create Internet Gateway Use Case
//!
//! Allocates a new, detached internet gateway. Nothing is provisioned on the
//! control plane until the gateway is attached.

use std::sync::Arc;

use crate::domain::gateways::ItemRepository;
use crate::domain::models::{InternetGateway, ItemAttributes, RequestContext};
use crate::shared::errors::UseCaseError;

use super::InternetGatewayView;

/// Use case for creating an internet gateway
pub struct CreateInternetGatewayUseCase {
    item_repository: Arc<dyn ItemRepository>,
}

impl CreateInternetGatewayUseCase {
    /// Create a new CreateInternetGatewayUseCase
    #[must_use]
    pub fn new(item_repository: Arc<dyn ItemRepository>) -> Self {
        Self { item_repository }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::Repository` if the store fails.
    pub async fn execute(&self, ctx: &RequestContext) -> Result<InternetGatewayView, UseCaseError> {
        tracing::info!(project_id = %ctx.project_id, user_id = %ctx.user_id, "Creating internet gateway");

        let item = self
            .item_repository
            .add(&ctx.project_id, ItemAttributes::InternetGateway { vpc_id: None })
            .await?;
        let gateway = InternetGateway::try_from(item)?;

        tracing::info!(
            project_id = %ctx.project_id,
            internet_gateway_id = %gateway.external_id(),
            "Internet gateway created"
        );

        Ok(InternetGatewayView::from(&gateway))
    }
}
