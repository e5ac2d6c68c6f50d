use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::traits::ConfigCache;
use crate::errors::Result;
use crate::forms::EntityRef;
use crate::storage::ConfigStore;

/// 带读缓存的配置存储
///
/// 读：先查缓存，未命中再读底层存储并回填。
/// 写：直接透传，缓存由保存流程显式失效。
///
/// 每个实体维护一个失效代数，失效时先递增代数再清缓存。回填前后各比对一次代数，
/// 读取期间发生过失效的快照不会留在缓存里。
pub struct CachedConfigStore {
    inner: Arc<dyn ConfigStore>,
    cache: Arc<dyn ConfigCache>,
    generations: DashMap<EntityRef, u64>,
}

impl CachedConfigStore {
    pub fn new(inner: Arc<dyn ConfigStore>, cache: Arc<dyn ConfigCache>) -> Self {
        Self {
            inner,
            cache,
            generations: DashMap::new(),
        }
    }

    fn generation(&self, entity: &EntityRef) -> u64 {
        self.generations.get(entity).map(|g| *g).unwrap_or(0)
    }

    fn bump_generation(&self, entity: &EntityRef) {
        *self.generations.entry(*entity).or_insert(0) += 1;
    }
}

#[async_trait]
impl ConfigStore for CachedConfigStore {
    async fn get_all(&self, entity: &EntityRef) -> Result<HashMap<String, String>> {
        if let Some(values) = self.cache.get(entity).await {
            return Ok(values.as_ref().clone());
        }

        let generation = self.generation(entity);
        let values = self.inner.get_all(entity).await?;
        if self.generation(entity) != generation {
            debug!("Skipping cache fill for {}: invalidated during read", entity);
            return Ok(values);
        }

        self.cache.insert(*entity, Arc::new(values.clone())).await;
        if self.generation(entity) != generation {
            self.cache.invalidate(entity).await;
        }
        Ok(values)
    }

    async fn set_all(&self, entity: &EntityRef, values: &HashMap<String, String>) -> Result<()> {
        self.inner.set_all(entity, values).await
    }

    async fn prune(&self, entity: &EntityRef, keep: &HashSet<String>) -> Result<u64> {
        self.inner.prune(entity, keep).await
    }

    async fn invalidate(&self, entity: &EntityRef) {
        self.bump_generation(entity);
        self.cache.invalidate(entity).await;
        self.inner.invalidate(entity).await;
    }

    async fn invalidate_cascade(&self, entity: &EntityRef) {
        self.bump_generation(entity);
        self.cache.invalidate_cascade(entity).await;
        self.inner.invalidate_cascade(entity).await;
    }
}
