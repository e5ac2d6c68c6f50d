use async_trait::async_trait;
use tracing::debug;

use super::traits::{ConfigCache, ConfigSnapshot};
use crate::forms::EntityRef;

/// 不缓存任何内容，`cache.enabled = false` 时使用
pub struct NullConfigCache;

impl Default for NullConfigCache {
    fn default() -> Self {
        Self::new()
    }
}

impl NullConfigCache {
    pub fn new() -> Self {
        debug!("Using NullConfigCache: config reads always hit the store");
        NullConfigCache
    }
}

#[async_trait]
impl ConfigCache for NullConfigCache {
    async fn get(&self, _entity: &EntityRef) -> Option<ConfigSnapshot> {
        None
    }

    async fn insert(&self, entity: EntityRef, _values: ConfigSnapshot) {
        debug!("NullConfigCache.insert called for {}", entity);
    }

    async fn invalidate(&self, entity: &EntityRef) {
        debug!("NullConfigCache.invalidate called for {}", entity);
    }

    async fn invalidate_cascade(&self, entity: &EntityRef) {
        debug!("NullConfigCache.invalidate_cascade called for {}", entity);
    }

    async fn get_derived(&self, _entity: &EntityRef, _key: &str) -> Option<String> {
        None
    }

    async fn insert_derived(&self, _entity: EntityRef, _key: String, _value: String) {}
}
