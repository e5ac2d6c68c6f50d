use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Membership::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Membership::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Membership::ScopeId).big_integer().not_null())
                    .col(ColumnDef::new(Membership::MemberId).big_integer().not_null())
                    .col(ColumnDef::new(Membership::DisplayName).string().not_null())
                    .to_owned(),
            )
            .await?;

        // 按组织查询成员列表
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_membership_scope")
                    .table(Membership::Table)
                    .col(Membership::ScopeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_membership_scope").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Membership::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Membership {
    #[sea_orm(iden = "membership")]
    Table,
    Id,
    ScopeId,
    MemberId,
    DisplayName,
}
