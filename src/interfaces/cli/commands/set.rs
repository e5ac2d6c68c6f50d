//! Set command

use std::collections::HashMap;

use anyhow::Result;
use colored::Colorize;
use sea_orm::DatabaseConnection;

use crate::forms::{EntityKind, EntityRef};
use crate::storage::{ConfigStore, SeaOrmConfigStore};

/// 直接写入一个配置值，不经过表单校验
pub async fn set_config(
    db: DatabaseConnection,
    kind: EntityKind,
    id: i64,
    name: String,
    value: String,
) -> Result<()> {
    let entity = EntityRef::new(kind, id);
    let store = SeaOrmConfigStore::new(db);
    let old = store.get(&entity, &name).await?;

    let values = HashMap::from([(name.clone(), value.clone())]);
    store.set_all(&entity, &values).await?;
    store.invalidate(&entity).await;

    println!(
        "{} Updated {}: {} = {}",
        "✓".bold().green(),
        entity.to_string().cyan(),
        name.cyan(),
        value
    );
    if let Some(old) = old {
        println!("  {} {}", "Previous value:".dimmed(), old.dimmed());
    }
    Ok(())
}
