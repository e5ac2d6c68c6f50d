use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::forms::EntityRef;

/// 实体配置的整表快照
pub type ConfigSnapshot = Arc<HashMap<String, String>>;

/// 实体配置缓存
///
/// 元素缓存保存 `get_all` 的结果；派生缓存保存由配置计算出的值
/// （例如主题色生成的样式），只在级联失效时清除。
#[async_trait]
pub trait ConfigCache: Send + Sync {
    async fn get(&self, entity: &EntityRef) -> Option<ConfigSnapshot>;
    async fn insert(&self, entity: EntityRef, values: ConfigSnapshot);

    /// 失效元素缓存
    async fn invalidate(&self, entity: &EntityRef);

    /// 失效元素缓存和该实体的全部派生缓存
    async fn invalidate_cascade(&self, entity: &EntityRef);

    async fn get_derived(&self, entity: &EntityRef, key: &str) -> Option<String>;
    async fn insert_derived(&self, entity: EntityRef, key: String, value: String);
}
