pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20261016_000001_entity_config;
mod m20261016_000002_features;
mod m20261016_000003_membership;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_entity_config::Migration),
            Box::new(m20261016_000002_features::Migration),
            Box::new(m20261016_000003_membership::Migration),
        ]
    }
}
