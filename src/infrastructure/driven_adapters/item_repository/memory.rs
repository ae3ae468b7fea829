//! In-Memory Item Repository
//!
//! Keeps items in a process-local map. Keys are assigned from a single
//! counter, so they are unique across projects and kinds.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::gateways::ItemRepository;
use crate::domain::models::{Item, ItemAttributes, ItemKey, ProjectId, ResourceKind};
use crate::shared::errors::RepositoryError;

#[derive(Debug, Clone)]
struct StoredItem {
    project_id: ProjectId,
    item: Item,
}

/// In-memory implementation of ItemRepository
#[derive(Debug, Default)]
pub struct MemoryItemRepository {
    last_key: AtomicI64,
    items: RwLock<BTreeMap<ItemKey, StoredItem>>,
}

impl MemoryItemRepository {
    /// Create an empty MemoryItemRepository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for MemoryItemRepository {
    async fn find(
        &self,
        project_id: &ProjectId,
        kind: ResourceKind,
        key: ItemKey,
    ) -> Result<Option<Item>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items
            .get(&key)
            .filter(|stored| stored.project_id == *project_id && stored.item.kind() == kind)
            .map(|stored| stored.item.clone()))
    }

    async fn find_all(
        &self,
        project_id: &ProjectId,
        kind: ResourceKind,
        keys: Option<&[ItemKey]>,
    ) -> Result<Vec<Item>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|stored| stored.project_id == *project_id && stored.item.kind() == kind)
            .filter(|stored| keys.map_or(true, |keys| keys.contains(&stored.item.key())))
            .map(|stored| stored.item.clone())
            .collect())
    }

    async fn add(&self, project_id: &ProjectId, attributes: ItemAttributes) -> Result<Item, RepositoryError> {
        let key = ItemKey::new(self.last_key.fetch_add(1, Ordering::SeqCst) + 1);
        let item = Item::new(key, attributes);

        self.items.write().await.insert(
            key,
            StoredItem {
                project_id: project_id.clone(),
                item: item.clone(),
            },
        );
        Ok(item)
    }

    async fn update(&self, project_id: &ProjectId, item: &Item) -> Result<bool, RepositoryError> {
        let mut items = self.items.write().await;
        match items.get_mut(&item.key()) {
            Some(stored) if stored.project_id == *project_id && stored.item.kind() == item.kind() => {
                stored.item = item.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, project_id: &ProjectId, key: ItemKey) -> Result<bool, RepositoryError> {
        let mut items = self.items.write().await;
        if items.get(&key).is_some_and(|stored| stored.project_id == *project_id) {
            items.remove(&key);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> ProjectId {
        ProjectId::new(name)
    }

    fn detached() -> ItemAttributes {
        ItemAttributes::InternetGateway { vpc_id: None }
    }

    #[tokio::test]
    async fn should_scope_items_by_project() {
        let repo = MemoryItemRepository::new();
        let item = repo.add(&project("a"), detached()).await.unwrap();

        let own = repo.find(&project("a"), ResourceKind::InternetGateway, item.key()).await.unwrap();
        let foreign = repo.find(&project("b"), ResourceKind::InternetGateway, item.key()).await.unwrap();

        assert_eq!(own, Some(item.clone()));
        assert_eq!(foreign, None);
        assert!(!repo.delete(&project("b"), item.key()).await.unwrap());
    }

    #[tokio::test]
    async fn should_not_find_item_under_other_kind() {
        let repo = MemoryItemRepository::new();
        let item = repo.add(&project("a"), detached()).await.unwrap();

        let found = repo.find(&project("a"), ResourceKind::Vpc, item.key()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn should_restrict_find_all_to_requested_keys() {
        let repo = MemoryItemRepository::new();
        let first = repo.add(&project("a"), detached()).await.unwrap();
        repo.add(&project("a"), detached()).await.unwrap();

        let found = repo
            .find_all(&project("a"), ResourceKind::InternetGateway, Some([first.key(), ItemKey::new(99)].as_slice()))
            .await
            .unwrap();
        assert_eq!(found, vec![first]);

        let all = repo.find_all(&project("a"), ResourceKind::InternetGateway, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn should_update_existing_item_only() {
        let repo = MemoryItemRepository::new();
        let item = repo.add(&project("a"), detached()).await.unwrap();

        let attached = Item::new(item.key(), ItemAttributes::InternetGateway { vpc_id: Some(ItemKey::new(5)) });
        assert!(repo.update(&project("a"), &attached).await.unwrap());
        assert_eq!(
            repo.find(&project("a"), ResourceKind::InternetGateway, item.key()).await.unwrap(),
            Some(attached)
        );

        let missing = Item::new(ItemKey::new(42), detached());
        assert!(!repo.update(&project("a"), &missing).await.unwrap());
    }
}
