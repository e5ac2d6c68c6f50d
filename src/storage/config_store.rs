use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::OnConflict,
};
use tracing::debug;

use super::traits::ConfigStore;
use crate::errors::{ConfigFormError, Result};
use crate::forms::EntityRef;
use migration::entities::entity_config;

/// 基于 SeaORM 的实体配置存储
#[derive(Clone)]
pub struct SeaOrmConfigStore {
    db: DatabaseConnection,
}

impl SeaOrmConfigStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 获取单个配置值
    pub async fn get(&self, entity: &EntityRef, name: &str) -> Result<Option<String>> {
        let result = entity_config::Entity::find()
            .filter(entity_config::Column::EntityKind.eq(entity.kind.as_str()))
            .filter(entity_config::Column::EntityId.eq(entity.id))
            .filter(entity_config::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!(
                    "Failed to query config '{}' of {}: {}",
                    name, entity, e
                ))
            })?;

        Ok(result.map(|m| m.value))
    }
}

#[async_trait]
impl ConfigStore for SeaOrmConfigStore {
    async fn get_all(&self, entity: &EntityRef) -> Result<HashMap<String, String>> {
        let records = entity_config::Entity::find()
            .filter(entity_config::Column::EntityKind.eq(entity.kind.as_str()))
            .filter(entity_config::Column::EntityId.eq(entity.id))
            .all(&self.db)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!(
                    "Failed to query configs of {}: {}",
                    entity, e
                ))
            })?;

        Ok(records.into_iter().map(|r| (r.name, r.value)).collect())
    }

    async fn set_all(&self, entity: &EntityRef, values: &HashMap<String, String>) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await.map_err(|e| {
            ConfigFormError::database_operation(format!("Failed to begin transaction: {}", e))
        })?;

        let now = chrono::Utc::now();
        let active_models: Vec<entity_config::ActiveModel> = values
            .iter()
            .map(|(name, value)| entity_config::ActiveModel {
                id: Default::default(),
                entity_kind: Set(entity.kind.as_str().to_string()),
                entity_id: Set(entity.id),
                name: Set(name.clone()),
                value: Set(value.clone()),
                updated_at: Set(now),
            })
            .collect();

        // 唯一索引冲突时覆盖 value
        entity_config::Entity::insert_many(active_models)
            .on_conflict(
                OnConflict::columns([
                    entity_config::Column::EntityKind,
                    entity_config::Column::EntityId,
                    entity_config::Column::Name,
                ])
                .update_columns([
                    entity_config::Column::Value,
                    entity_config::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&txn)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!(
                    "Failed to write configs of {}: {}",
                    entity, e
                ))
            })?;

        txn.commit().await.map_err(|e| {
            ConfigFormError::database_operation(format!("Failed to commit transaction: {}", e))
        })?;

        debug!("Wrote {} config rows for {}", values.len(), entity);
        Ok(())
    }

    async fn prune(&self, entity: &EntityRef, keep: &HashSet<String>) -> Result<u64> {
        let mut query = entity_config::Entity::delete_many()
            .filter(entity_config::Column::EntityKind.eq(entity.kind.as_str()))
            .filter(entity_config::Column::EntityId.eq(entity.id));
        if !keep.is_empty() {
            query = query.filter(entity_config::Column::Name.is_not_in(keep.iter().cloned()));
        }

        let result = query.exec(&self.db).await.map_err(|e| {
            ConfigFormError::database_operation(format!(
                "Failed to prune configs of {}: {}",
                entity, e
            ))
        })?;

        Ok(result.rows_affected)
    }
}
