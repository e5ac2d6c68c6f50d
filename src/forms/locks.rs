//! 按实体串行化保存
//!
//! 同一进程内对同一实体的配置写入、缓存失效、二次保存依次执行；
//! 跨进程仍是逐 key 的最后写入生效。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::types::EntityRef;

#[derive(Debug, Default)]
pub struct EntityLocks {
    inner: DashMap<EntityRef, Arc<Mutex<()>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取实体锁，guard 释放前其他保存会等待
    pub async fn lock(&self, entity: &EntityRef) -> OwnedMutexGuard<()> {
        let mutex = self
            .inner
            .entry(*entity)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// 已创建的锁数量
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
