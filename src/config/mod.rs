mod classification;
mod core;
mod engine;
mod loader;

pub use classification::PatternDetectionConfig;
pub use self::core::CleanmapConfig;
pub use engine::EngineOptions;
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
