use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "feature")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub slug: String,
    /// 占位功能，不出现在选择表单中
    pub placeholder: bool,
    /// true 表示组织级功能，false 表示活动级功能
    pub overall: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
