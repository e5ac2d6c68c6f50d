use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub mod config_store;
pub mod connection;
pub mod feature_store;
pub mod memory;
pub mod models;
pub mod people;
pub mod traits;

pub use config_store::SeaOrmConfigStore;
pub use connection::{connect, infer_backend_from_url, run_migrations};
pub use feature_store::SeaOrmFeatureStore;
pub use memory::{MemoryConfigStore, MemoryFeatureStore, MemoryPeopleLookup};
pub use models::{Feature, FeatureModule, Person};
pub use people::SeaOrmPeopleLookup;
pub use traits::{ConfigStore, FeatureStore, PeopleLookup};

use crate::cache::{CachedConfigStore, create_config_cache};
use crate::forms::EntityLocks;

/// 表单依赖的全部存储句柄
#[derive(Clone)]
pub struct FormStores {
    pub config: Arc<dyn ConfigStore>,
    pub features: Arc<dyn FeatureStore>,
    pub people: Arc<dyn PeopleLookup>,
    pub locks: Arc<EntityLocks>,
}

impl FormStores {
    pub fn new(
        config: Arc<dyn ConfigStore>,
        features: Arc<dyn FeatureStore>,
        people: Arc<dyn PeopleLookup>,
    ) -> Self {
        Self {
            config,
            features,
            people,
            locks: Arc::new(EntityLocks::new()),
        }
    }

    /// 全内存存储，不带缓存
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryConfigStore::new()),
            Arc::new(MemoryFeatureStore::new()),
            Arc::new(MemoryPeopleLookup::new()),
        )
    }

    /// 基于数据库连接创建，`cache.enabled = false` 时使用空缓存
    pub fn from_connection(db: DatabaseConnection) -> Self {
        let config_store = CachedConfigStore::new(
            Arc::new(SeaOrmConfigStore::new(db.clone())),
            create_config_cache(),
        );

        Self::new(
            Arc::new(config_store),
            Arc::new(SeaOrmFeatureStore::new(db.clone())),
            Arc::new(SeaOrmPeopleLookup::new(db)),
        )
    }
}
