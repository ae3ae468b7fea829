//! Fixtures shared by the internet gateway use case tests

use crate::domain::gateways::{ItemRepository, ProviderNetwork};
use crate::domain::models::{InternetGateway, ItemAttributes, ItemKey, ProjectId, RequestContext, ResourceKind, Vpc};
use crate::infrastructure::driven_adapters::item_repository::MemoryItemRepository;

pub(super) const EXTERNAL_NETWORK: &str = "public";

pub(super) fn context() -> RequestContext {
    RequestContext::new(ProjectId::new("project-a"), "user-1")
}

pub(super) fn other_context() -> RequestContext {
    RequestContext::new(ProjectId::new("project-b"), "user-2")
}

pub(super) fn public_network() -> ProviderNetwork {
    ProviderNetwork {
        id: "net-public".to_string(),
        name: EXTERNAL_NETWORK.to_string(),
    }
}

pub(super) async fn seed_vpc(repository: &MemoryItemRepository, ctx: &RequestContext, router_id: &str) -> Vpc {
    let item = repository
        .add(
            &ctx.project_id,
            ItemAttributes::Vpc {
                os_id: router_id.to_string(),
            },
        )
        .await
        .unwrap();
    Vpc::try_from(item).unwrap()
}

pub(super) async fn seed_gateway(
    repository: &MemoryItemRepository,
    ctx: &RequestContext,
    vpc_id: Option<ItemKey>,
) -> InternetGateway {
    let item = repository
        .add(&ctx.project_id, ItemAttributes::InternetGateway { vpc_id })
        .await
        .unwrap();
    InternetGateway::try_from(item).unwrap()
}

pub(super) async fn stored_gateway(repository: &MemoryItemRepository, ctx: &RequestContext, key: ItemKey) -> InternetGateway {
    let item = repository
        .find(&ctx.project_id, ResourceKind::InternetGateway, key)
        .await
        .unwrap()
        .expect("gateway should be stored");
    InternetGateway::try_from(item).unwrap()
}
