//! Item Repository Gateway
//!
//! Abstract contract of the durable item store. Every call is scoped to one
//! project; records of other projects are invisible.

use async_trait::async_trait;

use crate::domain::models::{Item, ItemAttributes, ItemKey, ProjectId, ResourceKind};
use crate::shared::errors::RepositoryError;

/// Repository trait for scoped item persistence
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Find one item of the given kind
    async fn find(
        &self,
        project_id: &ProjectId,
        kind: ResourceKind,
        key: ItemKey,
    ) -> Result<Option<Item>, RepositoryError>;

    /// Find all items of a kind, optionally restricted to the given keys.
    /// Keys that do not exist are skipped.
    async fn find_all(
        &self,
        project_id: &ProjectId,
        kind: ResourceKind,
        keys: Option<&[ItemKey]>,
    ) -> Result<Vec<Item>, RepositoryError>;

    /// Store a new item and assign its key
    async fn add(&self, project_id: &ProjectId, attributes: ItemAttributes) -> Result<Item, RepositoryError>;

    /// Replace the attributes of an existing item. Returns false if it is gone.
    async fn update(&self, project_id: &ProjectId, item: &Item) -> Result<bool, RepositoryError>;

    /// Remove an item. Returns false if it did not exist.
    async fn delete(&self, project_id: &ProjectId, key: ItemKey) -> Result<bool, RepositoryError>;
}
