use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::OnConflict,
};
use tracing::debug;

use super::models::{Feature, FeatureModule};
use super::traits::FeatureStore;
use crate::errors::{ConfigFormError, Result};
use crate::forms::EntityRef;
use migration::entities::{entity_feature, feature, feature_module};

/// 基于 SeaORM 的功能开关存储
#[derive(Clone)]
pub struct SeaOrmFeatureStore {
    db: DatabaseConnection,
}

impl SeaOrmFeatureStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 新增或更新功能模块
    pub async fn upsert_module(&self, module: &FeatureModule) -> Result<()> {
        let model = feature_module::ActiveModel {
            id: Set(module.id),
            name: Set(module.name.clone()),
            slug: Set(module.slug.clone()),
            display_order: Set(module.order),
        };

        feature_module::Entity::insert(model)
            .on_conflict(
                OnConflict::column(feature_module::Column::Id)
                    .update_columns([
                        feature_module::Column::Name,
                        feature_module::Column::Slug,
                        feature_module::Column::DisplayOrder,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!(
                    "Failed to save feature module '{}': {}",
                    module.slug, e
                ))
            })?;
        Ok(())
    }

    /// 新增或更新功能
    pub async fn upsert_feature(&self, item: &Feature) -> Result<()> {
        let model = feature::ActiveModel {
            id: Set(item.id),
            module_id: Set(item.module_id),
            name: Set(item.name.clone()),
            slug: Set(item.slug.clone()),
            placeholder: Set(item.placeholder),
            overall: Set(item.overall),
        };

        feature::Entity::insert(model)
            .on_conflict(
                OnConflict::column(feature::Column::Id)
                    .update_columns([
                        feature::Column::ModuleId,
                        feature::Column::Name,
                        feature::Column::Slug,
                        feature::Column::Placeholder,
                        feature::Column::Overall,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!(
                    "Failed to save feature '{}': {}",
                    item.slug, e
                ))
            })?;
        Ok(())
    }
}

#[async_trait]
impl FeatureStore for SeaOrmFeatureStore {
    async fn get_enabled(&self, entity: &EntityRef) -> Result<HashSet<i64>> {
        let records = entity_feature::Entity::find()
            .filter(entity_feature::Column::EntityKind.eq(entity.kind.as_str()))
            .filter(entity_feature::Column::EntityId.eq(entity.id))
            .all(&self.db)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!(
                    "Failed to query features of {}: {}",
                    entity, e
                ))
            })?;

        Ok(records.into_iter().map(|r| r.feature_id).collect())
    }

    async fn replace_all(&self, entity: &EntityRef, features: &HashSet<i64>) -> Result<()> {
        let txn = self.db.begin().await.map_err(|e| {
            ConfigFormError::database_operation(format!("Failed to begin transaction: {}", e))
        })?;

        entity_feature::Entity::delete_many()
            .filter(entity_feature::Column::EntityKind.eq(entity.kind.as_str()))
            .filter(entity_feature::Column::EntityId.eq(entity.id))
            .exec(&txn)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!(
                    "Failed to clear features of {}: {}",
                    entity, e
                ))
            })?;

        if !features.is_empty() {
            let active_models: Vec<entity_feature::ActiveModel> = features
                .iter()
                .map(|feature_id| entity_feature::ActiveModel {
                    id: Default::default(),
                    entity_kind: Set(entity.kind.as_str().to_string()),
                    entity_id: Set(entity.id),
                    feature_id: Set(*feature_id),
                })
                .collect();

            entity_feature::Entity::insert_many(active_models)
                .exec(&txn)
                .await
                .map_err(|e| {
                    ConfigFormError::database_operation(format!(
                        "Failed to write features of {}: {}",
                        entity, e
                    ))
                })?;
        }

        txn.commit().await.map_err(|e| {
            ConfigFormError::database_operation(format!("Failed to commit transaction: {}", e))
        })?;

        debug!("Replaced feature set of {} ({} features)", entity, features.len());
        Ok(())
    }

    async fn list_modules(&self) -> Result<Vec<FeatureModule>> {
        let records = feature_module::Entity::find()
            .order_by_asc(feature_module::Column::DisplayOrder)
            .order_by_asc(feature_module::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!(
                    "Failed to query feature modules: {}",
                    e
                ))
            })?;

        Ok(records
            .into_iter()
            .map(|r| FeatureModule {
                id: r.id,
                name: r.name,
                slug: r.slug,
                order: r.display_order,
            })
            .collect())
    }

    async fn list_features(&self) -> Result<Vec<Feature>> {
        let records = feature::Entity::find()
            .order_by_asc(feature::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!("Failed to query features: {}", e))
            })?;

        Ok(records
            .into_iter()
            .map(|r| Feature {
                id: r.id,
                module_id: r.module_id,
                name: r.name,
                slug: r.slug,
                placeholder: r.placeholder,
                overall: r.overall,
            })
            .collect())
    }
}
