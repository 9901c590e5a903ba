mod loader;
mod models;

use anyhow::Result;
use std::path::Path;

pub use models::AnalyzerConfig;

/// Load the config file if one was given, otherwise use the defaults.
pub fn resolve(config_path: Option<&str>) -> Result<AnalyzerConfig> {
    match config_path {
        Some(path) => loader::load_config(Path::new(path)),
        None => Ok(AnalyzerConfig::default()),
    }
}
