//! Features command

use anyhow::Result;
use colored::Colorize;
use sea_orm::DatabaseConnection;

use crate::forms::{EntityKind, EntityRef, RESERVED_MODULE_ID};
use crate::storage::{FeatureStore, SeaOrmFeatureStore};

/// 按模块列出功能，标出已启用的功能
pub async fn list_features(db: DatabaseConnection, kind: EntityKind, id: i64) -> Result<()> {
    let entity = EntityRef::new(kind, id);
    let store = SeaOrmFeatureStore::new(db);

    let modules = store.list_modules().await?;
    let features = store.list_features().await?;
    let enabled = store.get_enabled(&entity).await?;

    println!("{} {}", "Features of".bold(), entity.to_string().cyan());
    for module in modules.iter().filter(|m| m.id != RESERVED_MODULE_ID) {
        println!("{}", module.name.bold());
        for feature in features.iter().filter(|f| f.module_id == module.id) {
            let mark = if enabled.contains(&feature.id) {
                "[x]".green()
            } else {
                "[ ]".dimmed()
            };
            let scope = if feature.overall { "association" } else { "event" };
            println!("  {} {} {}", mark, feature.name, format!("({})", scope).dimmed());
        }
    }
    Ok(())
}
