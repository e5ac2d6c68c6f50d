use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 entity_config 表
        manager
            .create_table(
                Table::create()
                    .table(EntityConfig::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntityConfig::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EntityConfig::EntityKind)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntityConfig::EntityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntityConfig::Name)
                            .string_len(150)
                            .not_null(),
                    )
                    .col(ColumnDef::new(EntityConfig::Value).text().not_null())
                    .col(
                        ColumnDef::new(EntityConfig::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引：entity_kind + entity_id + name
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_entity_config_unique")
                    .table(EntityConfig::Table)
                    .col(EntityConfig::EntityKind)
                    .col(EntityConfig::EntityId)
                    .col(EntityConfig::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_entity_config_unique").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EntityConfig::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EntityConfig {
    #[sea_orm(iden = "entity_config")]
    Table,
    Id,
    EntityKind,
    EntityId,
    Name,
    Value,
    UpdatedAt,
}
