//! Internet Gateway Use Cases
//!
//! Lifecycle of internet gateways: create, attach, detach, delete, describe.
//! No record state is cached between calls; every use case re-reads the store.

mod attach_internet_gateway;
mod create_internet_gateway;
mod delete_internet_gateway;
mod describe_internet_gateways;
mod detach_internet_gateway;
mod view;

#[cfg(test)]
mod test_support;

pub use attach_internet_gateway::AttachInternetGatewayUseCase;
pub use create_internet_gateway::CreateInternetGatewayUseCase;
pub use delete_internet_gateway::DeleteInternetGatewayUseCase;
pub use describe_internet_gateways::{DescribeFilter, DescribeInternetGatewaysUseCase};
pub use detach_internet_gateway::DetachInternetGatewayUseCase;
pub use view::{AttachmentState, AttachmentView, InternetGatewayView};

use crate::domain::gateways::ItemRepository;
use crate::domain::models::{ExternalId, InternetGateway, Item, ItemKey, ProjectId, ResourceKind, Vpc};
use crate::shared::errors::{RepositoryError, UseCaseError};

fn not_found(kind: ResourceKind, key: ItemKey) -> UseCaseError {
    UseCaseError::NotFound {
        kind,
        id: ExternalId::encode(kind, key).to_string(),
    }
}

async fn load_internet_gateway(
    repository: &dyn ItemRepository,
    project_id: &ProjectId,
    key: ItemKey,
) -> Result<InternetGateway, UseCaseError> {
    let item = repository
        .find(project_id, ResourceKind::InternetGateway, key)
        .await?
        .ok_or_else(|| not_found(ResourceKind::InternetGateway, key))?;
    Ok(InternetGateway::try_from(item)?)
}

async fn load_vpc(repository: &dyn ItemRepository, project_id: &ProjectId, key: ItemKey) -> Result<Vpc, UseCaseError> {
    let item = repository
        .find(project_id, ResourceKind::Vpc, key)
        .await?
        .ok_or_else(|| not_found(ResourceKind::Vpc, key))?;
    Ok(Vpc::try_from(item)?)
}

async fn save_internet_gateway(
    repository: &dyn ItemRepository,
    project_id: &ProjectId,
    gateway: &InternetGateway,
) -> Result<(), UseCaseError> {
    if repository.update(project_id, &Item::from(gateway.clone())).await? {
        Ok(())
    } else {
        Err(not_found(ResourceKind::InternetGateway, gateway.key()))
    }
}

/// Write back a gateway's previous state as a compensation step
async fn restore_internet_gateway(
    repository: &dyn ItemRepository,
    project_id: &ProjectId,
    previous: &InternetGateway,
) -> Result<(), RepositoryError> {
    if !repository.update(project_id, &Item::from(previous.clone())).await? {
        tracing::warn!(
            project_id = %project_id,
            internet_gateway_id = %previous.external_id(),
            "Internet gateway vanished before its state could be restored"
        );
    }
    Ok(())
}
