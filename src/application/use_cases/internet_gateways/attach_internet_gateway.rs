//! Attach Internet Gateway Use Case
//!
//! Attaches a gateway to a VPC by setting the VPC router's external gateway
//! to the configured public network. The store is written first and reverted
//! if the control plane rejects the change.

use std::sync::Arc;

use crate::application::compensation::Compensation;
use crate::application::locks::{LockKey, ResourceLocks};
use crate::domain::gateways::{GatewayInfo, ItemRepository, NetworkControlPlane, NetworkFilter};
use crate::domain::models::{ExternalId, InternetGateway, ItemKey, RequestContext, ResourceKind};
use crate::shared::errors::UseCaseError;

use super::{load_internet_gateway, load_vpc, restore_internet_gateway, save_internet_gateway};

/// Use case for attaching an internet gateway to a VPC
pub struct AttachInternetGatewayUseCase {
    item_repository: Arc<dyn ItemRepository>,
    control_plane: Arc<dyn NetworkControlPlane>,
    locks: Arc<ResourceLocks>,
    external_network: String,
}

impl AttachInternetGatewayUseCase {
    /// Create a new AttachInternetGatewayUseCase
    ///
    /// `external_network` names the control plane network gateways attach to.
    #[must_use]
    pub fn new(
        item_repository: Arc<dyn ItemRepository>,
        control_plane: Arc<dyn NetworkControlPlane>,
        locks: Arc<ResourceLocks>,
        external_network: impl Into<String>,
    ) -> Self {
        Self {
            item_repository,
            control_plane,
            locks,
            external_network: external_network.into(),
        }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::NotFound` if the gateway or VPC does not exist.
    /// Returns `UseCaseError::ResourceAlreadyAssociated` if the gateway is already attached.
    /// Returns `UseCaseError::InvalidParameterValue` if another gateway is attached to the VPC.
    /// Returns `UseCaseError::PreconditionFailed` if the external network is missing.
    /// Returns `UseCaseError::ControlPlane` if the control plane call fails; the
    /// gateway record is reverted first.
    pub async fn execute(&self, ctx: &RequestContext, gateway_key: ItemKey, vpc_key: ItemKey) -> Result<bool, UseCaseError> {
        let project_id = &ctx.project_id;
        let gateway_id = ExternalId::encode(ResourceKind::InternetGateway, gateway_key);
        let vpc_id = ExternalId::encode(ResourceKind::Vpc, vpc_key);

        tracing::info!(
            project_id = %project_id,
            internet_gateway_id = %gateway_id,
            vpc_id = %vpc_id,
            "Attaching internet gateway"
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

        if let Some(attached_vpc) = gateway.vpc_id() {
            let attached_vpc_id = ExternalId::encode(ResourceKind::Vpc, attached_vpc);
            tracing::warn!(
                internet_gateway_id = %gateway_id,
                attached_vpc_id = %attached_vpc_id,
                "Internet gateway is already attached"
            );
            return Err(UseCaseError::ResourceAlreadyAssociated(format!(
                "resource {gateway_id} is already attached to network {attached_vpc_id}"
            )));
        }

        let gateways = self
            .item_repository
            .find_all(project_id, ResourceKind::InternetGateway, None)
            .await?;
        for item in gateways {
            let other = InternetGateway::try_from(item)?;
            if other.key() != gateway.key() && other.is_attached_to(vpc.key()) {
                tracing::warn!(
                    vpc_id = %vpc_id,
                    attached_internet_gateway_id = %other.external_id(),
                    "VPC already has an internet gateway"
                );
                return Err(UseCaseError::InvalidParameterValue(format!(
                    "Network {vpc_id} already has an internet gateway attached"
                )));
            }
        }

        let public_network = self
            .control_plane
            .list_networks(&NetworkFilter::external_named(&self.external_network))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                tracing::error!(external_network = %self.external_network, "External network not found on control plane");
                UseCaseError::PreconditionFailed(format!(
                    "external network '{}' is not available",
                    self.external_network
                ))
            })?;

        save_internet_gateway(self.item_repository.as_ref(), project_id, &gateway.attached_to(vpc.key())).await?;
        let compensation = {
            let repository = self.item_repository.clone();
            let project_id = project_id.clone();
            let previous = gateway.clone();
            // The reversal owns the locks; an abandoned request keeps them until the record is restored
            Compensation::register("detach internet gateway record", move || async move {
                let _locks = locks;
                restore_internet_gateway(repository.as_ref(), &project_id, &previous).await
            })
        };

        let gateway_info = GatewayInfo {
            network_id: public_network.id,
        };
        compensation
            .guard(self.control_plane.add_gateway_router(vpc.os_id(), &gateway_info))
            .await
            .map_err(|err| {
                tracing::warn!(
                    internet_gateway_id = %gateway_id,
                    vpc_id = %vpc_id,
                    router_id = vpc.os_id(),
                    error = %err,
                    "Control plane rejected gateway attachment"
                );
                err
            })?;

        tracing::info!(
            project_id = %project_id,
            internet_gateway_id = %gateway_id,
            vpc_id = %vpc_id,
            "Internet gateway attached"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::internet_gateways::test_support::{
        context, other_context, public_network, seed_gateway, seed_vpc, stored_gateway, EXTERNAL_NETWORK,
    };
    use crate::domain::gateways::network_control_plane::MockNetworkControlPlane;
    use crate::domain::gateways::ProviderNetwork;
    use crate::infrastructure::driven_adapters::item_repository::MemoryItemRepository;
    use crate::shared::errors::ControlPlaneError;
    use async_trait::async_trait;
    use std::time::Duration;

    fn use_case(repo: &Arc<MemoryItemRepository>, control_plane: MockNetworkControlPlane) -> AttachInternetGatewayUseCase {
        AttachInternetGatewayUseCase::new(
            repo.clone(),
            Arc::new(control_plane),
            Arc::new(ResourceLocks::new()),
            EXTERNAL_NETWORK,
        )
    }

    fn control_plane_accepting(router_id: &'static str) -> MockNetworkControlPlane {
        let mut control_plane = MockNetworkControlPlane::new();
        control_plane
            .expect_list_networks()
            .withf(|filter| *filter == NetworkFilter::external_named(EXTERNAL_NETWORK))
            .times(1)
            .returning(|_| Ok(vec![public_network()]));
        control_plane
            .expect_add_gateway_router()
            .withf(move |router, gateway| router == router_id && gateway.network_id == "net-public")
            .times(1)
            .returning(|_, _| Ok(()));
        control_plane
    }

    fn control_plane_untouched() -> MockNetworkControlPlane {
        let mut control_plane = MockNetworkControlPlane::new();
        control_plane.expect_list_networks().never();
        control_plane.expect_add_gateway_router().never();
        control_plane
    }

    #[tokio::test]
    async fn should_attach_gateway_and_record_vpc() {
        let repo = Arc::new(MemoryItemRepository::new());
        let ctx = context();
        let vpc = seed_vpc(&repo, &ctx, "router-1").await;
        let gateway = seed_gateway(&repo, &ctx, None).await;

        let result = use_case(&repo, control_plane_accepting("router-1"))
            .execute(&ctx, gateway.key(), vpc.key())
            .await;

        assert!(result.unwrap());
        assert!(stored_gateway(&repo, &ctx, gateway.key()).await.is_attached_to(vpc.key()));
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_gateway() {
        let repo = Arc::new(MemoryItemRepository::new());
        let ctx = context();
        let vpc = seed_vpc(&repo, &ctx, "router-1").await;

        let result = use_case(&repo, control_plane_untouched())
            .execute(&ctx, ItemKey::new(999), vpc.key())
            .await;

        assert!(matches!(
            result.unwrap_err(),
            UseCaseError::NotFound {
                kind: ResourceKind::InternetGateway,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_vpc() {
        let repo = Arc::new(MemoryItemRepository::new());
        let ctx = context();
        let gateway = seed_gateway(&repo, &ctx, None).await;

        let result = use_case(&repo, control_plane_untouched())
            .execute(&ctx, gateway.key(), ItemKey::new(999))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            UseCaseError::NotFound {
                kind: ResourceKind::Vpc,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn should_not_resolve_resources_of_another_project() {
        let repo = Arc::new(MemoryItemRepository::new());
        let owner = context();
        let vpc = seed_vpc(&repo, &owner, "router-1").await;
        let gateway = seed_gateway(&repo, &owner, None).await;

        let result = use_case(&repo, control_plane_untouched())
            .execute(&other_context(), gateway.key(), vpc.key())
            .await;

        assert!(matches!(result.unwrap_err(), UseCaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn should_reject_reattaching_an_attached_gateway() {
        let repo = Arc::new(MemoryItemRepository::new());
        let ctx = context();
        let first_vpc = seed_vpc(&repo, &ctx, "router-1").await;
        let second_vpc = seed_vpc(&repo, &ctx, "router-2").await;
        let gateway = seed_gateway(&repo, &ctx, Some(first_vpc.key())).await;

        for vpc in [&first_vpc, &second_vpc] {
            let result = use_case(&repo, control_plane_untouched())
                .execute(&ctx, gateway.key(), vpc.key())
                .await;
            assert!(matches!(result.unwrap_err(), UseCaseError::ResourceAlreadyAssociated(_)));
        }
        assert!(stored_gateway(&repo, &ctx, gateway.key()).await.is_attached_to(first_vpc.key()));
    }

    #[tokio::test]
    async fn should_reject_second_gateway_on_same_vpc() {
        let repo = Arc::new(MemoryItemRepository::new());
        let ctx = context();
        let vpc = seed_vpc(&repo, &ctx, "router-1").await;
        seed_gateway(&repo, &ctx, Some(vpc.key())).await;
        let second = seed_gateway(&repo, &ctx, None).await;

        let result = use_case(&repo, control_plane_untouched())
            .execute(&ctx, second.key(), vpc.key())
            .await;

        assert!(matches!(result.unwrap_err(), UseCaseError::InvalidParameterValue(_)));
        assert!(!stored_gateway(&repo, &ctx, second.key()).await.is_attached());
    }

    #[tokio::test]
    async fn should_fail_precondition_when_external_network_missing() {
        let repo = Arc::new(MemoryItemRepository::new());
        let ctx = context();
        let vpc = seed_vpc(&repo, &ctx, "router-1").await;
        let gateway = seed_gateway(&repo, &ctx, None).await;

        let mut control_plane = MockNetworkControlPlane::new();
        control_plane.expect_list_networks().times(1).returning(|_| Ok(vec![]));
        control_plane.expect_add_gateway_router().never();

        let result = use_case(&repo, control_plane).execute(&ctx, gateway.key(), vpc.key()).await;

        assert!(matches!(result.unwrap_err(), UseCaseError::PreconditionFailed(_)));
        assert!(!stored_gateway(&repo, &ctx, gateway.key()).await.is_attached());
    }

    #[tokio::test]
    async fn should_revert_record_when_control_plane_fails() {
        let repo = Arc::new(MemoryItemRepository::new());
        let ctx = context();
        let vpc = seed_vpc(&repo, &ctx, "router-1").await;
        let gateway = seed_gateway(&repo, &ctx, None).await;

        let mut control_plane = MockNetworkControlPlane::new();
        control_plane
            .expect_list_networks()
            .times(1)
            .returning(|_| Ok(vec![public_network()]));
        control_plane.expect_add_gateway_router().times(1).returning(|_, _| {
            Err(ControlPlaneError::Status {
                status: 500,
                message: "router update failed".to_string(),
            })
        });

        let result = use_case(&repo, control_plane).execute(&ctx, gateway.key(), vpc.key()).await;

        assert!(matches!(result.unwrap_err(), UseCaseError::ControlPlane(_)));
        assert_eq!(stored_gateway(&repo, &ctx, gateway.key()).await, gateway);
    }

    /// Control plane whose attach call takes a while, so concurrent requests overlap
    struct SlowControlPlane;

    #[async_trait]
    impl NetworkControlPlane for SlowControlPlane {
        async fn list_networks(&self, _filter: &NetworkFilter) -> Result<Vec<ProviderNetwork>, ControlPlaneError> {
            Ok(vec![public_network()])
        }

        async fn add_gateway_router(&self, _router_id: &str, _gateway: &GatewayInfo) -> Result<(), ControlPlaneError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(())
        }

        async fn remove_gateway_router(&self, _router_id: &str) -> Result<(), ControlPlaneError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_serialize_concurrent_attaches_to_one_vpc() {
        let repo = Arc::new(MemoryItemRepository::new());
        let ctx = context();
        let vpc = seed_vpc(&repo, &ctx, "router-1").await;
        let first = seed_gateway(&repo, &ctx, None).await;
        let second = seed_gateway(&repo, &ctx, None).await;

        let use_case = AttachInternetGatewayUseCase::new(
            repo.clone(),
            Arc::new(SlowControlPlane),
            Arc::new(ResourceLocks::new()),
            EXTERNAL_NETWORK,
        );

        let (first_result, second_result) = tokio::join!(
            use_case.execute(&ctx, first.key(), vpc.key()),
            use_case.execute(&ctx, second.key(), vpc.key()),
        );

        let successes = [&first_result, &second_result].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert!([first_result, second_result]
            .into_iter()
            .any(|r| matches!(r, Err(UseCaseError::InvalidParameterValue(_)))));

        let attached = [first.key(), second.key()];
        let mut attached_count = 0;
        for key in attached {
            if stored_gateway(&repo, &ctx, key).await.is_attached_to(vpc.key()) {
                attached_count += 1;
            }
        }
        assert_eq!(attached_count, 1);
    }

    #[tokio::test]
    async fn should_release_lock_entries_after_each_request() {
        let repo = Arc::new(MemoryItemRepository::new());
        let ctx = context();
        let vpc = seed_vpc(&repo, &ctx, "router-1").await;
        let gateway = seed_gateway(&repo, &ctx, None).await;
        let locks = Arc::new(ResourceLocks::new());

        let missing = AttachInternetGatewayUseCase::new(
            repo.clone(),
            Arc::new(control_plane_untouched()),
            locks.clone(),
            EXTERNAL_NETWORK,
        );
        for value in 1000..2000 {
            let result = missing.execute(&ctx, ItemKey::new(value), ItemKey::new(value + 1000)).await;
            assert!(matches!(result.unwrap_err(), UseCaseError::NotFound { .. }));
        }
        assert_eq!(locks.len(), 0);

        let accepted = AttachInternetGatewayUseCase::new(
            repo.clone(),
            Arc::new(control_plane_accepting("router-1")),
            locks.clone(),
            EXTERNAL_NETWORK,
        );
        assert!(accepted.execute(&ctx, gateway.key(), vpc.key()).await.unwrap());
        assert_eq!(locks.len(), 0);
    }

    /// Control plane whose attach call never completes
    struct HangingControlPlane;

    #[async_trait]
    impl NetworkControlPlane for HangingControlPlane {
        async fn list_networks(&self, _filter: &NetworkFilter) -> Result<Vec<ProviderNetwork>, ControlPlaneError> {
            Ok(vec![public_network()])
        }

        async fn add_gateway_router(&self, _router_id: &str, _gateway: &GatewayInfo) -> Result<(), ControlPlaneError> {
            std::future::pending().await
        }

        async fn remove_gateway_router(&self, _router_id: &str) -> Result<(), ControlPlaneError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_hold_locks_until_abandoned_attach_is_reverted() {
        let repo = Arc::new(MemoryItemRepository::new());
        let ctx = context();
        let vpc = seed_vpc(&repo, &ctx, "router-1").await;
        let gateway = seed_gateway(&repo, &ctx, None).await;
        let locks = Arc::new(ResourceLocks::new());

        let use_case = Arc::new(AttachInternetGatewayUseCase::new(
            repo.clone(),
            Arc::new(HangingControlPlane),
            locks.clone(),
            EXTERNAL_NETWORK,
        ));
        let request = {
            let use_case = use_case.clone();
            let ctx = ctx.clone();
            let (gateway_key, vpc_key) = (gateway.key(), vpc.key());
            tokio::spawn(async move { use_case.execute(&ctx, gateway_key, vpc_key).await })
        };

        for _ in 0..50 {
            if stored_gateway(&repo, &ctx, gateway.key()).await.is_attached() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(stored_gateway(&repo, &ctx, gateway.key()).await.is_attached_to(vpc.key()));

        request.abort();
        assert!(request.await.unwrap_err().is_cancelled());

        let _held = tokio::time::timeout(
            Duration::from_secs(1),
            locks.acquire(vec![
                LockKey::new(&ctx.project_id, ResourceKind::InternetGateway, gateway.key()),
                LockKey::new(&ctx.project_id, ResourceKind::Vpc, vpc.key()),
            ]),
        )
        .await
        .expect("locks should be released once the record is restored");

        assert_eq!(stored_gateway(&repo, &ctx, gateway.key()).await, gateway);
    }
}
