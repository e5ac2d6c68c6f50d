//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::forms::EntityKind;

/// configform - inspect and edit per-entity configuration
#[derive(Parser)]
#[command(name = "configform")]
#[command(version)]
#[command(about = "Inspect and edit per-entity configuration stores", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run database migrations
    Migrate,

    /// Show stored configuration of an entity
    Show {
        /// Entity kind (association, event, run, member)
        kind: EntityKind,

        /// Entity id
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a raw configuration value
    Set {
        /// Entity kind (association, event, run, member)
        kind: EntityKind,

        /// Entity id
        id: i64,

        /// Configuration name
        name: String,

        /// New value (stored as-is)
        value: String,
    },

    /// List feature modules and the features enabled for an entity
    Features {
        /// Entity kind (association, event)
        kind: EntityKind,

        /// Entity id
        id: i64,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration file commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
