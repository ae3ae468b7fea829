//! Internet Gateway Domain Model
//!
//! A gateway that may be attached to at most one VPC at a time.

use super::identifier::{ExternalId, ItemKey, ResourceKind};
use super::item::{Item, ItemAttributes};
use crate::shared::errors::RepositoryError;

/// Internet gateway entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetGateway {
    key: ItemKey,
    vpc_id: Option<ItemKey>,
}

impl InternetGateway {
    /// Restore a gateway from persisted data
    #[must_use]
    pub fn restore(key: ItemKey, vpc_id: Option<ItemKey>) -> Self {
        Self { key, vpc_id }
    }

    /// Copy of this gateway attached to the given VPC
    #[must_use]
    pub fn attached_to(&self, vpc_id: ItemKey) -> Self {
        Self {
            key: self.key,
            vpc_id: Some(vpc_id),
        }
    }

    /// Copy of this gateway with no attachment
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            key: self.key,
            vpc_id: None,
        }
    }

    // Getters

    #[must_use]
    pub fn key(&self) -> ItemKey {
        self.key
    }

    #[must_use]
    pub fn vpc_id(&self) -> Option<ItemKey> {
        self.vpc_id
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.vpc_id.is_some()
    }

    #[must_use]
    pub fn is_attached_to(&self, vpc_id: ItemKey) -> bool {
        self.vpc_id == Some(vpc_id)
    }

    #[must_use]
    pub fn external_id(&self) -> ExternalId {
        ExternalId::encode(ResourceKind::InternetGateway, self.key)
    }
}

impl From<InternetGateway> for Item {
    fn from(gateway: InternetGateway) -> Self {
        Item::new(
            gateway.key,
            ItemAttributes::InternetGateway {
                vpc_id: gateway.vpc_id,
            },
        )
    }
}

impl TryFrom<Item> for InternetGateway {
    type Error = RepositoryError;

    fn try_from(item: Item) -> Result<Self, Self::Error> {
        let key = item.key();
        match item.into_attributes() {
            ItemAttributes::InternetGateway { vpc_id } => Ok(Self::restore(key, vpc_id)),
            other => Err(RepositoryError::Mapping(format!(
                "item {key} is a {} record, not an internet gateway",
                other.kind().prefix()
            ))),
        }
    }
}
