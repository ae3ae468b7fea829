//! PostgreSQL Item Repository Implementation
//!
//! Implements the ItemRepository trait using SQLx for PostgreSQL. Attributes
//! are kept in a JSONB column next to the project and kind.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::gateways::ItemRepository;
use crate::domain::models::{Item, ItemAttributes, ItemKey, ProjectId, ResourceKind};
use crate::shared::errors::RepositoryError;

/// Database row representation for the items table
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i64,
    kind: String,
    data: serde_json::Value,
}

impl TryFrom<ItemRow> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let kind = ResourceKind::from_prefix(&row.kind)
            .ok_or_else(|| RepositoryError::Mapping(format!("Unknown item kind '{}'", row.kind)))?;
        let attributes = ItemAttributes::from_json(kind, row.data)
            .map_err(|e| RepositoryError::Mapping(format!("Failed to parse {} attributes: {}", row.kind, e)))?;

        let key = ItemKey::try_from(row.id)
            .map_err(|_| RepositoryError::Mapping(format!("Invalid item key {}", row.id)))?;

        Ok(Item::new(key, attributes))
    }
}

/// PostgreSQL implementation of ItemRepository
pub struct PostgresItemRepository {
    pool: PgPool,
}

impl PostgresItemRepository {
    /// Create a new PostgresItemRepository
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn attributes_json(attributes: &ItemAttributes) -> Result<serde_json::Value, RepositoryError> {
    attributes
        .to_json()
        .map_err(|e| RepositoryError::Mapping(format!("Failed to serialize attributes: {}", e)))
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
    async fn find(
        &self,
        project_id: &ProjectId,
        kind: ResourceKind,
        key: ItemKey,
    ) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, kind, data
            FROM items
            WHERE project_id = $1 AND kind = $2 AND id = $3
            "#,
        )
        .bind(project_id.as_str())
        .bind(kind.prefix())
        .bind(key.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Item::try_from).transpose()
    }

    async fn find_all(
        &self,
        project_id: &ProjectId,
        kind: ResourceKind,
        keys: Option<&[ItemKey]>,
    ) -> Result<Vec<Item>, RepositoryError> {
        let rows = match keys {
            Some(keys) => {
                let ids: Vec<i64> = keys.iter().map(|key| key.value()).collect();
                sqlx::query_as::<_, ItemRow>(
                    r#"
                    SELECT id, kind, data
                    FROM items
                    WHERE project_id = $1 AND kind = $2 AND id = ANY($3)
                    ORDER BY id ASC
                    "#,
                )
                .bind(project_id.as_str())
                .bind(kind.prefix())
                .bind(ids)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ItemRow>(
                    r#"
                    SELECT id, kind, data
                    FROM items
                    WHERE project_id = $1 AND kind = $2
                    ORDER BY id ASC
                    "#,
                )
                .bind(project_id.as_str())
                .bind(kind.prefix())
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Item::try_from).collect()
    }

    async fn add(&self, project_id: &ProjectId, attributes: ItemAttributes) -> Result<Item, RepositoryError> {
        let data = attributes_json(&attributes)?;

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO items (project_id, kind, data)
            VALUES ($1, $2, $3)
            RETURNING id, kind, data
            "#,
        )
        .bind(project_id.as_str())
        .bind(attributes.kind().prefix())
        .bind(&data)
        .fetch_one(&self.pool)
        .await?;

        Item::try_from(row)
    }

    async fn update(&self, project_id: &ProjectId, item: &Item) -> Result<bool, RepositoryError> {
        let data = attributes_json(item.attributes())?;

        let result = sqlx::query(
            r#"
            UPDATE items
            SET data = $4, updated_at = NOW()
            WHERE project_id = $1 AND kind = $2 AND id = $3
            "#,
        )
        .bind(project_id.as_str())
        .bind(item.kind().prefix())
        .bind(item.key().value())
        .bind(&data)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, project_id: &ProjectId, key: ItemKey) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM items
            WHERE project_id = $1 AND id = $2
            "#,
        )
        .bind(project_id.as_str())
        .bind(key.value())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
