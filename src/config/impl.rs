use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Falls back to in-memory defaults when `init_config()` has not run yet,
/// so library users embedding the engine do not need a config file.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration
///
/// Loads configuration from the given TOML path (or "config.toml" in the
/// current directory). If the file doesn't exist, uses in-memory defaults.
///
/// # Examples
/// ```no_run
/// use configform::config::init_config;
/// init_config(None);
/// ```
pub fn init_config(path: Option<&str>) {
    let loaded = StaticConfig::load(path);
    match CONFIG.get() {
        Some(current) => current.store(Arc::new(loaded)),
        None => {
            CONFIG.get_or_init(|| ArcSwap::from_pointee(loaded));
        }
    }
}

/// Replace the global configuration with an explicit value
pub fn init_config_with(config: StaticConfig) {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .store(Arc::new(config));
}
