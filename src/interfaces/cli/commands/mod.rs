mod config_gen;
mod features;
mod set;
mod show;

pub use config_gen::config_generate;
pub use features::list_features;
pub use set::set_config;
pub use show::show_configs;
