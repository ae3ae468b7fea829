//! VPC Model
//!
//! Read-only view of a VPC owned by the VPC subsystem. Only the fields the
//! gateway lifecycle needs are kept.

use super::identifier::{ExternalId, ItemKey, ResourceKind};
use super::item::{Item, ItemAttributes};
use crate::shared::errors::RepositoryError;

/// VPC backed by a router on the network control plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vpc {
    key: ItemKey,
    os_id: String,
}

impl Vpc {
    #[must_use]
    pub fn restore(key: ItemKey, os_id: String) -> Self {
        Self { key, os_id }
    }

    #[must_use]
    pub fn key(&self) -> ItemKey {
        self.key
    }

    /// Router id on the control plane
    #[must_use]
    pub fn os_id(&self) -> &str {
        &self.os_id
    }

    #[must_use]
    pub fn external_id(&self) -> ExternalId {
        ExternalId::encode(ResourceKind::Vpc, self.key)
    }
}

impl TryFrom<Item> for Vpc {
    type Error = RepositoryError;

    fn try_from(item: Item) -> Result<Self, Self::Error> {
        let key = item.key();
        match item.into_attributes() {
            ItemAttributes::Vpc { os_id } => Ok(Self::restore(key, os_id)),
            other => Err(RepositoryError::Mapping(format!(
                "item {key} is a {} record, not a vpc",
                other.kind().prefix()
            ))),
        }
    }
}
