//! 功能模块与功能开关表
//!
//! - feature_module: 功能分组（id = 0 为保留模块）
//! - feature: 功能开关定义
//! - entity_feature: 实体已启用的功能

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. feature_module
        manager
            .create_table(
                Table::create()
                    .table(FeatureModule::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeatureModule::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeatureModule::Name).string().not_null())
                    .col(ColumnDef::new(FeatureModule::Slug).string().not_null())
                    .col(
                        ColumnDef::new(FeatureModule::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 2. feature
        manager
            .create_table(
                Table::create()
                    .table(Feature::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feature::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Feature::ModuleId).big_integer().not_null())
                    .col(ColumnDef::new(Feature::Name).string().not_null())
                    .col(ColumnDef::new(Feature::Slug).string().not_null())
                    .col(
                        ColumnDef::new(Feature::Placeholder)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Feature::Overall)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_feature_module")
                    .table(Feature::Table)
                    .col(Feature::ModuleId)
                    .to_owned(),
            )
            .await?;

        // 3. entity_feature
        manager
            .create_table(
                Table::create()
                    .table(EntityFeature::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntityFeature::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EntityFeature::EntityKind)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntityFeature::EntityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntityFeature::FeatureId)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引：entity_kind + entity_id + feature_id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_entity_feature_unique")
                    .table(EntityFeature::Table)
                    .col(EntityFeature::EntityKind)
                    .col(EntityFeature::EntityId)
                    .col(EntityFeature::FeatureId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_entity_feature_unique").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EntityFeature::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_feature_module").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Feature::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FeatureModule::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FeatureModule {
    #[sea_orm(iden = "feature_module")]
    Table,
    Id,
    Name,
    Slug,
    DisplayOrder,
}

#[derive(DeriveIden)]
enum Feature {
    #[sea_orm(iden = "feature")]
    Table,
    Id,
    ModuleId,
    Name,
    Slug,
    Placeholder,
    Overall,
}

#[derive(DeriveIden)]
enum EntityFeature {
    #[sea_orm(iden = "entity_feature")]
    Table,
    Id,
    EntityKind,
    EntityId,
    FeatureId,
}
