//! configform - schema-driven configuration forms
//!
//! Forms declare their configuration keys at construction time; values live in
//! a per-entity key/value store and are rendered, validated and saved through
//! a small set of typed fields.
//!
//! # Architecture
//! - `forms`: declarations, field factory, config and feature forms
//! - `storage`: store traits, SeaORM and in-memory implementations
//! - `cache`: read-through config cache with cascading invalidation
//! - `config`: static configuration (TOML + env)
//! - `errors`: crate error type
//! - `system`: logging setup
//! - `interfaces`: command-line tooling

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod forms;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod storage;
pub mod system;

pub use errors::{ConfigFormError, Result};
pub use forms::{
    ConfigDeclarer, ConfigForm, ConfigFormDef, ConfigType, EntityKind, EntityRef, FeatureForm,
    FeatureScope, FormContext, FormData,
};
pub use storage::FormStores;
