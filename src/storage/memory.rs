//! 内存存储实现
//!
//! 不落盘，用于嵌入式场景和测试。

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::models::{Feature, FeatureModule, Person};
use super::traits::{ConfigStore, FeatureStore, PeopleLookup};
use crate::errors::{ConfigFormError, Result};
use crate::forms::EntityRef;

#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    inner: DashMap<EntityRef, HashMap<String, String>>,
    writes: AtomicU64,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `set_all` 被调用的次数
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// 直接读取单个配置值
    pub fn get(&self, entity: &EntityRef, name: &str) -> Option<String> {
        self.inner
            .get(entity)
            .and_then(|values| values.get(name).cloned())
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get_all(&self, entity: &EntityRef) -> Result<HashMap<String, String>> {
        Ok(self
            .inner
            .get(entity)
            .map(|values| values.clone())
            .unwrap_or_default())
    }

    async fn set_all(&self, entity: &EntityRef, values: &HashMap<String, String>) -> Result<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let mut entry = self.inner.entry(*entity).or_default();
        for (name, value) in values {
            entry.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    async fn prune(&self, entity: &EntityRef, keep: &HashSet<String>) -> Result<u64> {
        let Some(mut entry) = self.inner.get_mut(entity) else {
            return Ok(0);
        };
        let before = entry.len();
        entry.retain(|name, _| keep.contains(name));
        Ok((before - entry.len()) as u64)
    }
}

#[derive(Debug, Default)]
pub struct MemoryFeatureStore {
    modules: RwLock<Vec<FeatureModule>>,
    features: RwLock<Vec<Feature>>,
    enabled: DashMap<EntityRef, HashSet<i64>>,
}

impl MemoryFeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(self, module: FeatureModule) -> Self {
        if let Ok(mut modules) = self.modules.write() {
            modules.push(module);
        }
        self
    }

    pub fn with_feature(self, feature: Feature) -> Self {
        if let Ok(mut features) = self.features.write() {
            features.push(feature);
        }
        self
    }
}

#[async_trait]
impl FeatureStore for MemoryFeatureStore {
    async fn get_enabled(&self, entity: &EntityRef) -> Result<HashSet<i64>> {
        Ok(self
            .enabled
            .get(entity)
            .map(|set| set.clone())
            .unwrap_or_default())
    }

    async fn replace_all(&self, entity: &EntityRef, features: &HashSet<i64>) -> Result<()> {
        self.enabled.insert(*entity, features.clone());
        Ok(())
    }

    async fn list_modules(&self) -> Result<Vec<FeatureModule>> {
        let modules = self.modules.read().map_err(|_| {
            ConfigFormError::database_operation("Cannot acquire feature module read lock")
        })?;
        let mut sorted = modules.clone();
        sorted.sort_by_key(|m| (m.order, m.id));
        Ok(sorted)
    }

    async fn list_features(&self) -> Result<Vec<Feature>> {
        let features = self.features.read().map_err(|_| {
            ConfigFormError::database_operation("Cannot acquire feature read lock")
        })?;
        let mut sorted = features.clone();
        sorted.sort_by_key(|f| f.id);
        Ok(sorted)
    }
}

#[derive(Debug, Default)]
pub struct MemoryPeopleLookup {
    inner: DashMap<i64, Vec<Person>>,
}

impl MemoryPeopleLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, scope_id: i64, member_id: i64, display_name: &str) {
        self.inner
            .entry(scope_id)
            .or_default()
            .push((member_id, display_name.to_string()));
    }
}

#[async_trait]
impl PeopleLookup for MemoryPeopleLookup {
    async fn list_people(&self, scope_id: i64) -> Result<Vec<Person>> {
        Ok(self
            .inner
            .get(&scope_id)
            .map(|people| people.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_store_upsert_and_prune() {
        let store = MemoryConfigStore::new();
        let entity = EntityRef::event(1);

        let mut values = HashMap::new();
        values.insert("a".to_string(), "1".to_string());
        values.insert("b".to_string(), "2".to_string());
        store.set_all(&entity, &values).await.unwrap();

        let mut update = HashMap::new();
        update.insert("a".to_string(), "3".to_string());
        store.set_all(&entity, &update).await.unwrap();

        assert_eq!(store.get(&entity, "a").as_deref(), Some("3"));
        assert_eq!(store.get(&entity, "b").as_deref(), Some("2"));
        assert_eq!(store.write_count(), 2);

        let keep: HashSet<String> = ["a".to_string()].into_iter().collect();
        assert_eq!(store.prune(&entity, &keep).await.unwrap(), 1);
        assert_eq!(store.get_all(&entity).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_entities_are_isolated() {
        let store = MemoryConfigStore::new();
        let mut values = HashMap::new();
        values.insert("a".to_string(), "1".to_string());
        store.set_all(&EntityRef::event(1), &values).await.unwrap();

        assert!(store.get_all(&EntityRef::run(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_people_lookup_scoped() {
        let people = MemoryPeopleLookup::new();
        people.add(1, 3, "Ada");
        people.add(2, 4, "Brin");
        assert_eq!(people.list_people(1).await.unwrap(), vec![(3, "Ada".to_string())]);
        assert!(people.list_people(9).await.unwrap().is_empty());
    }
}
