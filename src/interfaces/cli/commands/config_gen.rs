//! Generate config command

use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;

use crate::config::StaticConfig;

/// 生成示例配置文件
pub fn config_generate(output_path: Option<String>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    if !force && Path::new(&path).exists() {
        bail!("File already exists: {} (use --force to overwrite)", path);
    }

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| anyhow::anyhow!("Unable to write configuration file: {}", e))?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}
