//! CLI interface module

pub mod commands;

use anyhow::{Context, Result};

use crate::cli::{Commands, ConfigCommands};
use crate::config::get_config;
use crate::storage::connect;
use commands::{config_generate, list_features, set_config, show_configs};

/// 执行一条命令
pub async fn run_cli(command: Commands) -> Result<()> {
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = command
    {
        return config_generate(output_path, force).context("Failed to generate config file");
    }

    let database_url = get_config().database.database_url.clone();
    let db = connect(&database_url)
        .await
        .context("Failed to open configuration database")?;

    match command {
        Commands::Migrate => {
            println!("Migrations applied to {}", database_url);
            Ok(())
        }
        Commands::Show { kind, id, json } => show_configs(db, kind, id, json).await,
        Commands::Set {
            kind,
            id,
            name,
            value,
        } => set_config(db, kind, id, name, value).await,
        Commands::Features { kind, id } => list_features(db, kind, id).await,
        Commands::Config { .. } => Ok(()),
    }
}
