pub mod cached_store;
pub mod moka;
pub mod null;
pub mod traits;

use std::sync::Arc;

pub use cached_store::CachedConfigStore;
pub use self::moka::MokaConfigCache;
pub use null::NullConfigCache;
pub use traits::{ConfigCache, ConfigSnapshot};

/// 按配置创建缓存实现
pub fn create_config_cache() -> Arc<dyn ConfigCache> {
    let config = crate::config::get_config();
    if config.cache.enabled {
        Arc::new(MokaConfigCache::from_config())
    } else {
        Arc::new(NullConfigCache::new())
    }
}
