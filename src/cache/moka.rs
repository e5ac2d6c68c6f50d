use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, warn};

use super::traits::{ConfigCache, ConfigSnapshot};
use crate::forms::EntityRef;

pub struct MokaConfigCache {
    elements: Cache<EntityRef, ConfigSnapshot>,
    derived: Cache<(EntityRef, String), String>,
}

impl MokaConfigCache {
    pub fn new(default_ttl: Duration, max_capacity: u64) -> Self {
        let elements = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(default_ttl)
            .build();

        // 级联失效需要按实体批量清除
        let derived = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(default_ttl)
            .support_invalidation_closures()
            .build();

        debug!(
            "MokaConfigCache initialized with max capacity: {}, default TTL: {}s",
            max_capacity,
            default_ttl.as_secs()
        );
        Self { elements, derived }
    }

    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        Self::new(
            Duration::from_secs(config.cache.default_ttl),
            config.cache.max_capacity,
        )
    }
}

#[async_trait]
impl ConfigCache for MokaConfigCache {
    async fn get(&self, entity: &EntityRef) -> Option<ConfigSnapshot> {
        self.elements.get(entity).await
    }

    async fn insert(&self, entity: EntityRef, values: ConfigSnapshot) {
        self.elements.insert(entity, values).await;
    }

    async fn invalidate(&self, entity: &EntityRef) {
        self.elements.invalidate(entity).await;
        debug!("Config cache invalidated for {}", entity);
    }

    async fn invalidate_cascade(&self, entity: &EntityRef) {
        self.elements.invalidate(entity).await;

        let target = *entity;
        if let Err(e) = self
            .derived
            .invalidate_entries_if(move |key, _| key.0 == target)
        {
            warn!("Failed to invalidate derived cache for {}: {}", entity, e);
        }
        debug!("Config cache cascade-invalidated for {}", entity);
    }

    async fn get_derived(&self, entity: &EntityRef, key: &str) -> Option<String> {
        self.derived.get(&(*entity, key.to_string())).await
    }

    async fn insert_derived(&self, entity: EntityRef, key: String, value: String) {
        self.derived.insert((entity, key), value).await;
    }
}
