//! Show command

use std::collections::BTreeMap;

use anyhow::Result;
use colored::Colorize;
use sea_orm::DatabaseConnection;

use crate::forms::{EntityKind, EntityRef};
use crate::storage::{ConfigStore, SeaOrmConfigStore};

/// 打印实体的全部配置
pub async fn show_configs(
    db: DatabaseConnection,
    kind: EntityKind,
    id: i64,
    json: bool,
) -> Result<()> {
    let entity = EntityRef::new(kind, id);
    let store = SeaOrmConfigStore::new(db);
    let values: BTreeMap<String, String> = store.get_all(&entity).await?.into_iter().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if values.is_empty() {
        println!("{} {}", "No configuration stored for".yellow(), entity.to_string().cyan());
        return Ok(());
    }

    println!("{} {}", "Configuration of".bold(), entity.to_string().cyan());
    for (name, value) in &values {
        println!("  {} = {}", name.green(), value);
    }
    Ok(())
}
