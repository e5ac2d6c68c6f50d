use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::models::{Feature, FeatureModule, Person};
use crate::errors::Result;
use crate::forms::EntityRef;

/// 实体级 key/value 配置存储
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// 一次查询读出实体的全部配置
    async fn get_all(&self, entity: &EntityRef) -> Result<HashMap<String, String>>;

    /// 批量写入（单个事务，已存在的行被覆盖）
    async fn set_all(&self, entity: &EntityRef, values: &HashMap<String, String>) -> Result<()>;

    /// 删除名字不在 `keep` 中的配置行，返回删除数量
    async fn prune(&self, entity: &EntityRef, keep: &HashSet<String>) -> Result<u64>;

    /// 失效该实体的配置缓存
    async fn invalidate(&self, entity: &EntityRef) {
        tracing::debug!("No config cache to invalidate for {}", entity);
    }

    /// 失效该实体的配置缓存以及由配置派生的缓存
    async fn invalidate_cascade(&self, entity: &EntityRef) {
        tracing::debug!("No derived config cache to invalidate for {}", entity);
    }
}

/// 功能开关关系存储
#[async_trait]
pub trait FeatureStore: Send + Sync {
    async fn get_enabled(&self, entity: &EntityRef) -> Result<HashSet<i64>>;

    /// 清空后整体写入
    async fn replace_all(&self, entity: &EntityRef, features: &HashSet<i64>) -> Result<()>;

    /// 按显示顺序返回所有模块
    async fn list_modules(&self) -> Result<Vec<FeatureModule>>;

    async fn list_features(&self) -> Result<Vec<Feature>>;
}

/// 按组织查询成员
#[async_trait]
pub trait PeopleLookup: Send + Sync {
    async fn list_people(&self, scope_id: i64) -> Result<Vec<Person>>;
}
