use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::models::Person;
use super::traits::PeopleLookup;
use crate::errors::{ConfigFormError, Result};
use migration::entities::membership;

/// 基于 membership 表的成员查询
#[derive(Clone)]
pub struct SeaOrmPeopleLookup {
    db: DatabaseConnection,
}

impl SeaOrmPeopleLookup {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 添加成员到组织
    pub async fn add_member(&self, scope_id: i64, member_id: i64, display_name: &str) -> Result<()> {
        let model = membership::ActiveModel {
            id: Default::default(),
            scope_id: Set(scope_id),
            member_id: Set(member_id),
            display_name: Set(display_name.to_string()),
        };

        membership::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!(
                    "Failed to add member {} to {}: {}",
                    member_id, scope_id, e
                ))
            })?;
        Ok(())
    }
}

#[async_trait]
impl PeopleLookup for SeaOrmPeopleLookup {
    async fn list_people(&self, scope_id: i64) -> Result<Vec<Person>> {
        let records = membership::Entity::find()
            .filter(membership::Column::ScopeId.eq(scope_id))
            .order_by_asc(membership::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                ConfigFormError::database_operation(format!(
                    "Failed to query members of {}: {}",
                    scope_id, e
                ))
            })?;

        Ok(records
            .into_iter()
            .map(|r| (r.member_id, r.display_name))
            .collect())
    }
}
