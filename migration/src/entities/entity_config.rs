//! 实体级 key/value 配置行
//!
//! 每个 (entity_kind, entity_id, name) 最多一行，value 一律以字符串保存。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "entity_config")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// association / event / run / member
    pub entity_kind: String,
    pub entity_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub value: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
